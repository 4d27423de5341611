//! Request model for resume compilation.
//!
//! Section payloads arrive loosely typed: the client sends `{type, content}` pairs and
//! `content` may be any JSON. Parsing is lenient: a field with the wrong JSON type
//! reads as empty, entries that are not objects are dropped,
//! and content that is not an object at all yields [`SectionContent::Malformed`].
//! None of this ever rejects the request. Top-level `null`s read as empty values too.

use std::ops::Deref;

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeRequest {
    #[serde(default, deserialize_with = "null_as_default")]
    pub basic_details: BasicDetails,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sections: Vec<Section>,
}

/// Personal details. Missing or `null` required keys deserialize to empty strings so
/// they surface through [`validate`] instead of as a JSON format error.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BasicDetails {
    #[serde(deserialize_with = "null_as_default")]
    pub first_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub last_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(deserialize_with = "null_as_default")]
    pub city: String,
    #[serde(deserialize_with = "null_as_default")]
    pub province: String,
    pub github: Option<String>,
    pub linkedin: Option<String>,
    pub portfolio: Option<String>,
}

/// Checks required basic details. All violations are collected, in field order.
pub fn validate(request: &ResumeRequest) -> Result<(), Vec<String>> {
    let details = &request.basic_details;
    let required = [
        (&details.first_name, "First name is required"),
        (&details.last_name, "Last name is required"),
        (&details.email, "Email is required"),
        (&details.city, "City is required"),
        (&details.province, "Province is required"),
    ];

    let errors: Vec<String> = required
        .iter()
        .filter(|(value, _)| value.is_empty())
        .map(|(_, message)| message.to_string())
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Sections
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    ProfileSummary,
    TechSkills,
    Experience,
    Projects,
    Volunteer,
    Education,
}

impl SectionKind {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "profile_summary" => Some(Self::ProfileSummary),
            "tech_skills" => Some(Self::TechSkills),
            "experience" => Some(Self::Experience),
            "projects" => Some(Self::Projects),
            "volunteer" => Some(Self::Volunteer),
            "education" => Some(Self::Education),
            _ => None,
        }
    }
}

/// One resume section in document order.
#[derive(Debug, Clone, Deserialize)]
#[serde(from = "RawSection")]
pub struct Section {
    pub content: SectionContent,
    /// Hidden sections are kept in the request but never rendered.
    pub visible: bool,
}

#[cfg(test)]
impl Section {
    pub fn new(content: SectionContent) -> Self {
        Self {
            content,
            visible: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SectionContent {
    ProfileSummary(ProfileSummary),
    TechSkills(EntryList<SkillCategory>),
    Experience(EntryList<ExperienceEntry>),
    Projects(EntryList<ProjectEntry>),
    Volunteer(EntryList<VolunteerEntry>),
    Education(EntryList<EducationEntry>),
    /// Known kind whose content was not a JSON object.
    Malformed(SectionKind),
    /// Unrecognized `type` tag.
    Unknown(String),
}

/// Well-formed entries of a list section, plus the length of the JSON array they
/// came from. A section is empty only when that array was; an array holding nothing
/// but malformed entries still gets its section wrapper.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryList<T> {
    pub entries: Vec<T>,
    pub raw_len: usize,
}

impl<T> EntryList<T> {
    fn parse<'a>(
        obj: &'a Map<String, Value>,
        key: &str,
        entry: impl FnMut(&'a Map<String, Value>) -> T,
    ) -> Self {
        let items = obj.get(key).and_then(Value::as_array);
        EntryList {
            entries: items
                .into_iter()
                .flatten()
                .filter_map(Value::as_object)
                .map(entry)
                .collect(),
            raw_len: items.map_or(0, Vec::len),
        }
    }

    /// True when the client sent no entries at all.
    pub fn no_data(&self) -> bool {
        self.raw_len == 0
    }
}

impl<T> From<Vec<T>> for EntryList<T> {
    fn from(entries: Vec<T>) -> Self {
        let raw_len = entries.len();
        EntryList { entries, raw_len }
    }
}

impl<T> Deref for EntryList<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.entries
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SummaryFormat {
    Paragraph,
    #[default]
    Bullets,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProfileSummary {
    pub format: SummaryFormat,
    pub text: String,
    pub bullets: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SkillCategory {
    pub name: String,
    pub skills: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExperienceEntry {
    pub company: String,
    pub title: String,
    pub location: String,
    pub start_date: String,
    pub end_date: String,
    pub bullets: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProjectEntry {
    pub name: String,
    pub description: Vec<String>,
    pub technologies: Option<String>,
    pub link: Option<String>,
    pub date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct VolunteerEntry {
    pub organization: String,
    pub title: String,
    pub location: String,
    pub start_date: String,
    pub end_date: String,
    pub bullets: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct EducationEntry {
    pub institution: String,
    pub degree: String,
    pub start_date: String,
    pub end_date: String,
}

#[derive(Deserialize)]
struct RawSection {
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    kind: String,
    #[serde(default)]
    content: Value,
    #[serde(default)]
    visible: Option<bool>,
}

impl From<RawSection> for Section {
    fn from(raw: RawSection) -> Self {
        Section {
            content: SectionContent::parse(&raw.kind, &raw.content),
            visible: raw.visible.unwrap_or(true),
        }
    }
}

/// Reads JSON `null` as `T::default()`.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl SectionContent {
    /// Builds a typed section from its tag and free-form payload.
    pub fn parse(tag: &str, content: &Value) -> Self {
        let Some(kind) = SectionKind::from_tag(tag) else {
            return SectionContent::Unknown(tag.to_string());
        };
        let Some(obj) = content.as_object() else {
            return SectionContent::Malformed(kind);
        };

        match kind {
            SectionKind::ProfileSummary => SectionContent::ProfileSummary(ProfileSummary {
                format: match str_field(obj, "format").as_str() {
                    "paragraph" => SummaryFormat::Paragraph,
                    _ => SummaryFormat::Bullets,
                },
                text: str_field(obj, "text"),
                bullets: string_list(obj, "bullets"),
            }),
            SectionKind::TechSkills => SectionContent::TechSkills(EntryList::parse(
                obj,
                "categories",
                |c| SkillCategory {
                    name: str_field(c, "name"),
                    skills: str_field(c, "skills"),
                },
            )),
            SectionKind::Experience => SectionContent::Experience(EntryList::parse(
                obj,
                "entries",
                |e| ExperienceEntry {
                    company: str_field(e, "company"),
                    title: str_field(e, "title"),
                    location: str_field(e, "location"),
                    start_date: str_field(e, "startDate"),
                    end_date: str_field(e, "endDate"),
                    bullets: string_list(e, "bullets"),
                },
            )),
            SectionKind::Projects => SectionContent::Projects(EntryList::parse(
                obj,
                "entries",
                |e| ProjectEntry {
                    name: str_field(e, "name"),
                    description: string_list(e, "description"),
                    technologies: opt_str_field(e, "technologies"),
                    link: opt_str_field(e, "link"),
                    date: opt_str_field(e, "date"),
                },
            )),
            SectionKind::Volunteer => SectionContent::Volunteer(EntryList::parse(
                obj,
                "entries",
                |e| VolunteerEntry {
                    organization: str_field(e, "organization"),
                    title: str_field(e, "title"),
                    location: str_field(e, "location"),
                    start_date: str_field(e, "startDate"),
                    end_date: str_field(e, "endDate"),
                    bullets: string_list(e, "bullets"),
                },
            )),
            SectionKind::Education => SectionContent::Education(EntryList::parse(
                obj,
                "entries",
                |e| EducationEntry {
                    institution: str_field(e, "institution"),
                    degree: str_field(e, "degree"),
                    start_date: str_field(e, "startDate"),
                    end_date: str_field(e, "endDate"),
                },
            )),
        }
    }
}

fn str_field(obj: &Map<String, Value>, key: &str) -> String {
    obj.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Empty strings are treated the same as an absent key.
fn opt_str_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn string_list(obj: &Map<String, Value>, key: &str) -> Vec<String> {
    obj.get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(details: Value) -> ResumeRequest {
        serde_json::from_value(json!({ "basicDetails": details, "sections": [] }))
            .expect("request should deserialize")
    }

    #[test]
    fn test_validate_accepts_complete_details() {
        let req = request(json!({
            "firstName": "Ada",
            "lastName": "Lovelace",
            "email": "ada@example.com",
            "city": "London",
            "province": "ON"
        }));
        assert!(validate(&req).is_ok());
    }

    #[test]
    fn test_validate_missing_email_reports_only_email() {
        let req = request(json!({
            "firstName": "Ada",
            "lastName": "Lovelace",
            "city": "London",
            "province": "ON"
        }));
        let errors = validate(&req).unwrap_err();
        assert_eq!(errors, vec!["Email is required".to_string()]);
    }

    #[test]
    fn test_validate_all_missing_reports_five_in_order() {
        let req = request(json!({}));
        let errors = validate(&req).unwrap_err();
        assert_eq!(
            errors,
            vec![
                "First name is required",
                "Last name is required",
                "Email is required",
                "City is required",
                "Province is required",
            ]
        );
    }

    #[test]
    fn test_validate_only_rejects_empty_strings() {
        let req = request(json!({
            "firstName": "  ",
            "lastName": "Lovelace",
            "email": "ada@example.com",
            "city": "London",
            "province": "ON"
        }));
        assert!(validate(&req).is_ok());
    }

    #[test]
    fn test_null_required_field_is_validation_error() {
        let req = request(json!({
            "firstName": null,
            "lastName": "Lovelace",
            "email": "ada@example.com",
            "city": "London",
            "province": "ON",
            "github": null
        }));
        assert_eq!(req.basic_details.first_name, "");
        assert!(req.basic_details.github.is_none());
        assert_eq!(validate(&req).unwrap_err(), vec!["First name is required"]);
    }

    #[test]
    fn test_null_basic_details_reports_every_required_field() {
        let req: ResumeRequest =
            serde_json::from_value(json!({ "basicDetails": null, "sections": [] })).unwrap();
        assert_eq!(validate(&req).unwrap_err().len(), 5);
    }

    #[test]
    fn test_null_sections_reads_as_empty() {
        let req: ResumeRequest = serde_json::from_value(json!({
            "basicDetails": { "firstName": "Ada" },
            "sections": null
        }))
        .unwrap();
        assert!(req.sections.is_empty());
    }

    #[test]
    fn test_null_section_type_is_skipped_as_unknown() {
        let section: Section = serde_json::from_value(json!({
            "type": null,
            "content": { "entries": [] },
            "visible": null
        }))
        .unwrap();
        assert_eq!(section.content, SectionContent::Unknown(String::new()));
        assert!(section.visible);
    }

    #[test]
    fn test_missing_sections_key_defaults_to_empty() {
        let req: ResumeRequest =
            serde_json::from_value(json!({ "basicDetails": { "firstName": "Ada" } })).unwrap();
        assert!(req.sections.is_empty());
        assert_eq!(req.basic_details.first_name, "Ada");
        assert!(req.basic_details.github.is_none());
    }

    #[test]
    fn test_unknown_tag_maps_to_unknown() {
        let section: Section =
            serde_json::from_value(json!({ "type": "hobbies", "content": {} })).unwrap();
        assert_eq!(section.content, SectionContent::Unknown("hobbies".into()));
        assert!(section.visible);
    }

    #[test]
    fn test_non_object_content_is_malformed() {
        let section: Section =
            serde_json::from_value(json!({ "type": "experience", "content": [1, 2] })).unwrap();
        assert_eq!(
            section.content,
            SectionContent::Malformed(SectionKind::Experience)
        );
    }

    #[test]
    fn test_hidden_section_flag_is_kept() {
        let section: Section = serde_json::from_value(json!({
            "id": "abc",
            "type": "education",
            "content": { "entries": [] },
            "visible": false
        }))
        .unwrap();
        assert!(!section.visible);
    }

    #[test]
    fn test_profile_summary_defaults_to_bullets_and_drops_non_strings() {
        let content = SectionContent::parse(
            "profile_summary",
            &json!({ "format": "fancy", "bullets": ["one", 2, null, "two"] }),
        );
        let SectionContent::ProfileSummary(summary) = content else {
            panic!("expected profile summary");
        };
        assert_eq!(summary.format, SummaryFormat::Bullets);
        assert_eq!(summary.bullets, vec!["one", "two"]);
    }

    #[test]
    fn test_experience_skips_non_object_entries_and_blanks_bad_fields() {
        let content = SectionContent::parse(
            "experience",
            &json!({ "entries": [
                "garbage",
                { "company": "Acme", "title": 42, "bullets": "not a list" }
            ]}),
        );
        let SectionContent::Experience(entries) = content else {
            panic!("expected experience");
        };
        assert_eq!(entries.len(), 1);
        assert_eq!(entries.raw_len, 2);
        assert!(!entries.no_data());
        assert_eq!(entries[0].company, "Acme");
        assert_eq!(entries[0].title, "");
        assert!(entries[0].bullets.is_empty());
    }

    #[test]
    fn test_project_optional_fields_treat_empty_as_absent() {
        let content = SectionContent::parse(
            "projects",
            &json!({ "entries": [{ "name": "Tool", "link": "", "date": "2024" }] }),
        );
        let SectionContent::Projects(entries) = content else {
            panic!("expected projects");
        };
        assert_eq!(entries[0].link, None);
        assert_eq!(entries[0].date.as_deref(), Some("2024"));
    }

    #[test]
    fn test_all_malformed_entries_keep_section_non_empty() {
        let content =
            SectionContent::parse("tech_skills", &json!({ "categories": ["x", 1] }));
        let SectionContent::TechSkills(categories) = content else {
            panic!("expected tech skills");
        };
        assert!(categories.entries.is_empty());
        assert!(!categories.no_data());
    }

    #[test]
    fn test_missing_entries_key_is_empty() {
        let content = SectionContent::parse("education", &json!({ "entries": "none" }));
        let SectionContent::Education(entries) = content else {
            panic!("expected education");
        };
        assert!(entries.no_data());
    }
}
