//! HTML and plain-text renderings of a [`SignatureModel`].
//!
//! Mail clients ignore stylesheets, so the fragment is a nested table with
//! inline styles. All model text and every attribute value is escaped here,
//! exactly once, through [`escape_html`].

use crate::render::{BrandRow, ContactRow, LocationRow, SignatureModel, SocialLink};
use crate::sanitize::escape_html;

const INK: &str = "#181127";
const RULE: &str = "1px solid #283e89";
const ROW_STYLE: &str = "vertical-align: middle; height: 25px;";
const CELL_STYLE: &str = "vertical-align: middle; font-size: 12px;";
const LINK_STYLE: &str = "text-decoration: none; color: #181127;";
const TABLE: [(&str, &str); 3] = [("cellpadding", "0"), ("cellspacing", "0"), ("style", "width: 100%;")];

/// Minimal element writer. Attribute values and text are escaped on the way in.
struct Writer {
    out: String,
}

impl Writer {
    fn new() -> Self {
        Self { out: String::with_capacity(4096) }
    }

    fn open(&mut self, tag: &str, attrs: &[(&str, &str)]) {
        self.start(tag, attrs);
        self.out.push('>');
    }

    fn void(&mut self, tag: &str, attrs: &[(&str, &str)]) {
        self.start(tag, attrs);
        self.out.push_str(" />");
    }

    fn start(&mut self, tag: &str, attrs: &[(&str, &str)]) {
        self.out.push('<');
        self.out.push_str(tag);
        for (name, value) in attrs {
            self.out.push(' ');
            self.out.push_str(name);
            self.out.push_str("=\"");
            self.out.push_str(&escape_html(value));
            self.out.push('"');
        }
    }

    fn close(&mut self, tag: &str) {
        self.out.push_str("</");
        self.out.push_str(tag);
        self.out.push('>');
    }

    fn text(&mut self, text: &str) {
        self.out.push_str(&escape_html(text));
    }

    fn span(&mut self, id: &str, text: &str) {
        self.open("span", &[("id", id)]);
        self.text(text);
        self.close("span");
    }

    fn table(&mut self, style: Option<&str>) {
        let attrs = [TABLE[0], TABLE[1], ("style", style.unwrap_or(TABLE[2].1))];
        self.open("table", &attrs);
        self.open("tbody", &[]);
    }

    fn end_table(&mut self) {
        self.close("tbody");
        self.close("table");
    }

    fn icon(&mut self, src: &str, alt: &str) {
        self.void(
            "img",
            &[
                ("src", src),
                ("width", "20"),
                ("height", "20"),
                ("alt", alt),
                ("style", "display: block;"),
            ],
        );
    }
}

/// Table-based, inline-styled fragment ready for a mail client.
pub fn to_html(model: &SignatureModel) -> String {
    let mut w = Writer::new();
    w.open(
        "div",
        &[(
            "style",
            "background-color: #ffffff; padding: 24px; font-family: Segoe UI, sans-serif; \
             font-size: 12px; line-height: 1.4; color: #181127;",
        )],
    );
    w.table(Some(
        "width: 100%; font-family: inherit; font-size: inherit; border-collapse: collapse;",
    ));

    w.open("tr", &[]);
    w.open("td", &[]);
    w.table(None);
    w.open("tr", &[]);
    identity_cell(&mut w, model);
    rows_cell(&mut w, model);
    w.close("tr");
    w.end_table();
    w.close("td");
    w.close("tr");

    w.open("tr", &[]);
    w.open("td", &[]);
    brand_table(&mut w, &model.brand);
    w.close("td");
    w.close("tr");

    w.open("tr", &[]);
    w.open("td", &[]);
    divider(&mut w);
    w.close("td");
    w.close("tr");

    w.end_table();
    w.close("div");
    w.out
}

fn identity_cell(w: &mut Writer, model: &SignatureModel) {
    w.open("td", &[("style", "vertical-align: middle;")]);
    w.open(
        "h3",
        &[("style", "margin: 0; font-size: 17px; font-weight: 500; color: #181127;")],
    );
    w.span("footer-naam", &model.identity.name);
    w.close("h3");
    w.open(
        "p",
        &[("style", "margin: 0; font-size: 12px; line-height: 22px; color: #181127;")],
    );
    w.span("footer-functie", &model.identity.role);
    w.close("p");
    w.close("td");
}

fn rows_cell(w: &mut Writer, model: &SignatureModel) {
    let style = format!("vertical-align: middle; border-left: {RULE}; padding-left: 16px;");
    w.open("td", &[("style", style.as_str())]);
    w.table(None);
    for row in &model.contact_rows {
        contact_row(w, row);
    }
    for (idx, row) in model.location_rows.iter().enumerate() {
        location_row(w, row, idx + 1);
    }
    w.end_table();
    w.close("td");
}

fn contact_row(w: &mut Writer, row: &ContactRow) {
    let suffix = row.kind.dom_suffix();
    let link_id = format!("link-{suffix}");
    let span_id = format!("footer-{suffix}");

    w.open("tr", &[("style", ROW_STYLE)]);
    w.open("td", &[("width", "30"), ("style", "vertical-align: middle;")]);
    w.icon(&row.icon_url, row.kind.alt());
    w.close("td");
    w.open("td", &[("style", CELL_STYLE)]);

    let mut attrs = vec![("id", link_id.as_str()), ("href", row.href.as_str())];
    if row.kind.opens_new_tab() {
        attrs.push(("target", "_blank"));
        attrs.push(("rel", "noopener noreferrer"));
    }
    attrs.push(("style", LINK_STYLE));
    w.open("a", &attrs);
    w.span(&span_id, &row.label);
    w.close("a");

    w.close("td");
    w.close("tr");
}

fn location_row(w: &mut Writer, row: &LocationRow, line: usize) {
    let span_id = format!("footer-locatie-{line}");
    w.open("tr", &[("style", ROW_STYLE)]);
    w.open("td", &[("width", "30"), ("style", "vertical-align: middle;")]);
    if let Some(icon) = &row.icon_url {
        w.icon(icon, "Location");
    }
    w.close("td");
    w.open("td", &[("style", CELL_STYLE)]);
    w.span(&span_id, &row.text);
    w.close("td");
    w.close("tr");
}

fn brand_table(w: &mut Writer, brand: &BrandRow) {
    w.table(Some("width: 100%; margin-top: 5px;"));
    w.open("tr", &[]);

    w.open("td", &[]);
    w.open(
        "a",
        &[("href", brand.logo.href.as_str()), ("target", "_blank"), ("rel", "noreferrer")],
    );
    w.void(
        "img",
        &[
            ("src", brand.logo.src.as_str()),
            ("width", "100"),
            ("alt", brand.logo.alt.as_str()),
            ("style", "max-height: 50px; width: auto; display: block;"),
        ],
    );
    w.close("a");
    w.close("td");

    w.open("td", &[("style", "padding-bottom: 2px; text-align: right;")]);
    w.table(Some("margin-left: auto; display: inline-flex; align-items: center;"));
    w.open("tr", &[]);
    for social in &brand.socials {
        social_cell(w, social);
    }
    w.close("tr");
    w.end_table();
    w.close("td");

    w.close("tr");
    w.end_table();
}

fn social_cell(w: &mut Writer, social: &SocialLink) {
    let id = format!("link-{}", social.kind.id());
    let style = format!("display: inline-block; padding: 0; color: {INK};");
    w.open("td", &[]);
    w.open(
        "a",
        &[
            ("id", id.as_str()),
            ("href", social.href.as_str()),
            ("target", "_blank"),
            ("rel", "noopener noreferrer"),
            ("style", style.as_str()),
        ],
    );
    w.icon(&social.icon_url, social.kind.id());
    w.close("a");
    w.close("td");
}

fn divider(w: &mut Writer) {
    let style = format!("width: 100%; border-bottom: {RULE}; display: block;");
    w.table(None);
    w.open("tr", &[]);
    w.open("td", &[("height", "5")]);
    w.close("td");
    w.close("tr");
    w.open("tr", &[]);
    w.open("td", &[("style", style.as_str())]);
    w.close("td");
    w.close("tr");
    w.open("tr", &[]);
    w.open("td", &[("height", "5")]);
    w.close("td");
    w.close("tr");
    w.end_table();
}

/// Text-only rendering: one line per row, social links as `Label: url`.
///
/// Model text is user input, not markup, so it is copied verbatim.
pub fn to_plain_text(model: &SignatureModel) -> String {
    let mut lines = Vec::new();
    let mut push = |line: &str| {
        let line = line.trim();
        if !line.is_empty() {
            lines.push(line.to_string());
        }
    };

    push(&model.identity.name);
    push(&model.identity.role);
    for row in &model.contact_rows {
        push(&row.label);
    }
    for row in &model.location_rows {
        push(&row.text);
    }
    for social in &model.brand.socials {
        push(&format!("{}: {}", social.kind.label(), social.href));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::{FieldId, FormState};
    use crate::render::{render, Branding};

    fn model(pairs: &[(FieldId, &str)]) -> SignatureModel {
        let mut state = FormState::defaults();
        for (id, v) in pairs {
            state.set(*id, *v);
        }
        render(&state.trimmed(), &Branding::default())
    }

    #[test]
    fn text_is_escaped_once() {
        let html = to_html(&model(&[(FieldId::Name, "Tom & <Jerry>")]));
        assert!(html.contains(r#"<span id="footer-naam">Tom &amp; &lt;Jerry&gt;</span>"#));
        assert!(!html.contains("&amp;amp;"));
        assert!(!html.contains("<Jerry>"));
    }

    #[test]
    fn attributes_are_escaped() {
        let html = to_html(&model(&[(FieldId::Website, "example.com/?a=1&b=\"2\"")]));
        assert!(html.contains(r#"href="https://example.com/?a=1&amp;b=%222%22""#));
    }

    #[test]
    fn ids_follow_the_fragment_layout() {
        let html = to_html(&model(&[
            (FieldId::Phone, "+32 470"),
            (FieldId::Location2, "België"),
        ]));
        for id in [
            "link-gsm",
            "footer-gsm",
            "footer-locatie-1",
            "footer-locatie-2",
            "link-facebook",
            "link-linkedin",
        ] {
            assert!(html.contains(&format!("id=\"{id}\"")), "missing {id}");
        }
        assert!(!html.contains("link-email"));
        assert!(!html.contains("link-instagram"));
    }

    #[test]
    fn plain_text_lists_rows_and_socials() {
        let text = to_plain_text(&model(&[
            (FieldId::Name, "Ada"),
            (FieldId::Role, "Engineer"),
            (FieldId::Email, "ada@example.com"),
            (FieldId::Location1, "Antwerpen"),
        ]));
        assert_eq!(
            text,
            "Ada\nEngineer\nada@example.com\nAntwerpen\n\
             Facebook: https://www.facebook.com/upshiftbe\n\
             LinkedIn: https://www.linkedin.com/company/upshift-be"
        );
    }

    #[test]
    fn plain_text_keeps_angle_brackets_the_html_escapes() {
        let sig = model(&[
            (FieldId::Name, "Ada <The Countess> Lovelace"),
            (FieldId::Location1, "Rue <Haute> 1"),
            (FieldId::Facebook, ""),
            (FieldId::Linkedin, ""),
        ]);

        let html = to_html(&sig);
        assert!(html.contains("Ada &lt;The Countess&gt; Lovelace"));

        let text = to_plain_text(&sig);
        assert_eq!(text, "Ada <The Countess> Lovelace\nRue <Haute> 1");
    }
}
