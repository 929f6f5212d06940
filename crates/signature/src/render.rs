//! Signature renderer: turns trimmed form values into a structured model.
//!
//! The model holds already-sanitized hrefs and raw (unescaped) text. Markup
//! generation and escaping happen in `markup`.

use serde::{Deserialize, Serialize};

use crate::form::TrimmedValues;
use crate::sanitize::{sanitize_email, sanitize_phone, sanitize_url, sanitize_web_url};

/// Where the bundled icons and logo are hosted.
pub const RAW_ASSET_BASE: &str =
    "https://raw.githubusercontent.com/upshiftbe/email-signature/refs/heads/main/src/assets";

pub const DEFAULT_LOGO_URL: &str =
    "https://raw.githubusercontent.com/upshiftbe/email-signature/refs/heads/main/src/assets/upshift_logo.png";

/// Deployment-specific assets and brand link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Branding {
    /// Base URL for the row icons, without trailing slash.
    pub asset_base_url: String,
    pub default_logo_url: String,
    /// Target of the logo link.
    pub brand_url: String,
    pub brand_name: String,
}

impl Default for Branding {
    fn default() -> Self {
        Self {
            asset_base_url: RAW_ASSET_BASE.to_string(),
            default_logo_url: DEFAULT_LOGO_URL.to_string(),
            brand_url: "https://upshift.be".to_string(),
            brand_name: "Upshift".to_string(),
        }
    }
}

impl Branding {
    pub fn icon_url(&self, file: &str) -> String {
        format!("{}/{}", self.asset_base_url.trim_end_matches('/'), file)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
    pub name: String,
    pub role: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactKind {
    Phone,
    Email,
    Website,
}

impl ContactKind {
    pub fn icon(self) -> &'static str {
        match self {
            ContactKind::Phone => "phone.png",
            ContactKind::Email => "mail.png",
            ContactKind::Website => "globe.png",
        }
    }

    pub fn alt(self) -> &'static str {
        match self {
            ContactKind::Phone => "Phone",
            ContactKind::Email => "Email",
            ContactKind::Website => "Website",
        }
    }

    /// Suffix of the element ids in the fragment (`link-gsm`, `footer-gsm`).
    pub fn dom_suffix(self) -> &'static str {
        match self {
            ContactKind::Phone => "gsm",
            ContactKind::Email => "email",
            ContactKind::Website => "website",
        }
    }

    /// Links that leave the mail client open in a new tab.
    pub fn opens_new_tab(self) -> bool {
        matches!(self, ContactKind::Website)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactRow {
    pub kind: ContactKind,
    pub href: String,
    pub label: String,
    pub icon_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocationRow {
    pub text: String,
    /// Only the primary line carries the building icon.
    pub icon_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SocialKind {
    Facebook,
    Linkedin,
    Instagram,
}

impl SocialKind {
    pub const ALL: [SocialKind; 3] = [SocialKind::Facebook, SocialKind::Linkedin, SocialKind::Instagram];

    pub fn id(self) -> &'static str {
        match self {
            SocialKind::Facebook => "facebook",
            SocialKind::Linkedin => "linkedin",
            SocialKind::Instagram => "instagram",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SocialKind::Facebook => "Facebook",
            SocialKind::Linkedin => "LinkedIn",
            SocialKind::Instagram => "Instagram",
        }
    }

    pub fn icon(self) -> String {
        format!("{}.png", self.id())
    }

    fn pick(self, values: &TrimmedValues) -> &str {
        match self {
            SocialKind::Facebook => &values.facebook,
            SocialKind::Linkedin => &values.linkedin,
            SocialKind::Instagram => &values.instagram,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SocialLink {
    pub kind: SocialKind,
    pub href: String,
    pub icon_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Logo {
    pub src: String,
    pub href: String,
    pub alt: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BrandRow {
    pub logo: Logo,
    pub socials: Vec<SocialLink>,
}

/// Everything the signature shows, sanitized but not yet escaped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignatureModel {
    pub identity: Identity,
    pub contact_rows: Vec<ContactRow>,
    pub location_rows: Vec<LocationRow>,
    pub brand: BrandRow,
}

pub fn render(values: &TrimmedValues, branding: &Branding) -> SignatureModel {
    let mut contact_rows = Vec::with_capacity(3);
    let mut push_contact = |kind: ContactKind, href: String, label: &str| {
        contact_rows.push(ContactRow {
            kind,
            href,
            label: label.to_string(),
            icon_url: branding.icon_url(kind.icon()),
        });
    };

    let phone = sanitize_phone(&values.phone);
    if !phone.is_empty() {
        push_contact(ContactKind::Phone, format!("tel:{phone}"), &values.phone);
    }

    let email = sanitize_email(&values.email);
    if !email.is_empty() {
        push_contact(ContactKind::Email, format!("mailto:{email}"), &values.email);
    }

    let website = sanitize_url(&values.website_url);
    if !website.is_empty() {
        let label = if values.website_label.is_empty() {
            website.clone()
        } else {
            values.website_label.clone()
        };
        push_contact(ContactKind::Website, website, &label);
    }

    let mut location_rows = vec![LocationRow {
        text: values.location1.clone(),
        icon_url: Some(branding.icon_url("building.png")),
    }];
    if !values.location2.is_empty() {
        location_rows.push(LocationRow {
            text: values.location2.clone(),
            icon_url: None,
        });
    }

    let socials = SocialKind::ALL
        .into_iter()
        .filter_map(|kind| {
            let href = sanitize_url(kind.pick(values));
            (!href.is_empty()).then(|| SocialLink {
                kind,
                href,
                icon_url: branding.icon_url(&kind.icon()),
            })
        })
        .collect();

    SignatureModel {
        identity: Identity {
            name: values.name.clone(),
            role: values.role.clone(),
        },
        contact_rows,
        location_rows,
        brand: BrandRow {
            logo: Logo {
                src: logo_src(&values.logo_url, branding),
                href: branding.brand_url.clone(),
                alt: branding.brand_name.clone(),
            },
            socials,
        },
    }
}

/// A user logo wins when it is a plain web link, else the bundled default.
fn logo_src(user_logo: &str, branding: &Branding) -> String {
    let sanitized = sanitize_web_url(user_logo);
    if sanitized.is_empty() {
        branding.default_logo_url.clone()
    } else {
        sanitized
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::{FieldId, FormState};
    use pretty_assertions::assert_eq;

    fn values(pairs: &[(FieldId, &str)]) -> TrimmedValues {
        let mut state = FormState::empty();
        for (id, v) in pairs {
            state.set(*id, *v);
        }
        state.trimmed()
    }

    #[test]
    fn default_logo_lives_with_the_assets() {
        assert!(DEFAULT_LOGO_URL.starts_with(RAW_ASSET_BASE));
        assert_eq!(Branding::default().icon_url("mail.png"), format!("{RAW_ASSET_BASE}/mail.png"));
    }

    #[test]
    fn empty_form_has_identity_and_primary_location_only() {
        let model = render(&values(&[]), &Branding::default());
        assert_eq!(model.identity.name, "");
        assert!(model.contact_rows.is_empty());
        assert_eq!(model.location_rows.len(), 1);
        assert!(model.brand.socials.is_empty());
        assert_eq!(model.brand.logo.src, DEFAULT_LOGO_URL);
    }

    #[test]
    fn contact_rows_use_sanitized_hrefs() {
        let model = render(
            &values(&[
                (FieldId::Phone, "+32 470 01<b>"),
                (FieldId::Email, " ada@example.com "),
                (FieldId::Website, "example.com"),
            ]),
            &Branding::default(),
        );

        let hrefs: Vec<_> = model.contact_rows.iter().map(|r| r.href.as_str()).collect();
        assert_eq!(
            hrefs,
            vec!["tel:+32 470 01", "mailto:ada@example.com", "https://example.com/"]
        );
        assert_eq!(model.contact_rows[0].label, "+32 470 01<b>");
        assert_eq!(model.contact_rows[2].label, "example.com");
    }

    #[test]
    fn rejected_values_drop_their_row() {
        let model = render(
            &values(&[
                (FieldId::Email, "not-an-email"),
                (FieldId::Website, "javascript:alert(1)"),
                (FieldId::Facebook, "javascript:alert(1)"),
                (FieldId::Instagram, "instagram.com/ada"),
            ]),
            &Branding::default(),
        );
        assert!(model.contact_rows.is_empty());
        assert_eq!(model.brand.socials.len(), 1);
        assert_eq!(model.brand.socials[0].kind, SocialKind::Instagram);
        assert_eq!(model.brand.socials[0].href, "https://instagram.com/ada");
    }

    #[test]
    fn website_label_falls_back_to_url() {
        let mut trimmed = values(&[(FieldId::Website, "https://example.com")]);
        trimmed.website_label.clear();
        let model = render(&trimmed, &Branding::default());
        assert_eq!(model.contact_rows[0].label, "https://example.com/");
    }

    #[test]
    fn secondary_location_only_when_set() {
        let model = render(
            &values(&[(FieldId::Location1, "Antwerpen"), (FieldId::Location2, "België")]),
            &Branding::default(),
        );
        assert_eq!(model.location_rows.len(), 2);
        assert!(model.location_rows[0].icon_url.is_some());
        assert_eq!(model.location_rows[1].icon_url, None);
    }

    #[test]
    fn user_logo_overrides_default_only_for_web_links() {
        let branding = Branding::default();
        let custom = render(&values(&[(FieldId::LogoUrl, "cdn.example.com/logo.png")]), &branding);
        assert_eq!(custom.brand.logo.src, "https://cdn.example.com/logo.png");

        let mail = render(&values(&[(FieldId::LogoUrl, "mailto:a@b.co")]), &branding);
        assert_eq!(mail.brand.logo.src, DEFAULT_LOGO_URL);
    }
}
