//! Renders a resume request into a complete LaTeX document for `resume.cls`.
//!
//! Every user-supplied display string goes through [`escape`]. Hyperlink targets are
//! written raw: `\href` receives the URL exactly as the client sent it.

use std::fmt::{self, Write};

use crate::latex::escape::escape;
use crate::models::resume::{
    BasicDetails, EducationEntry, EntryList, ExperienceEntry, ProfileSummary, ProjectEntry,
    Section, SectionContent, SkillCategory, SummaryFormat, VolunteerEntry,
};

const PREAMBLE: &str = r"\documentclass{resume}

\usepackage[left=0.4in,top=0.4in,right=0.4in,bottom=0.4in]{geometry}
\newcommand{\tab}[1]{\hspace{.2667\textwidth}\rlap{#1}}
\newcommand{\itab}[1]{\hspace{0em}\rlap{#1}}
";

/// Separator between contact items; `resume.cls` turns it into a diamond.
pub const CONTACT_SEPARATOR: &str = r" \\ ";

/// Produces the full document: envelope plus every visible section in input order.
pub fn render(details: &BasicDetails, sections: &[Section]) -> Result<String, fmt::Error> {
    let mut doc = String::with_capacity(4096);

    doc.push_str(PREAMBLE);
    writeln!(doc)?;
    writeln!(
        doc,
        r"\name{{ {} }}",
        escape(&format!("{} {}", details.first_name, details.last_name))
    )?;
    writeln!(
        doc,
        r"\address{{ {} }}",
        escape(&format!("{}, {}", details.city, details.province))
    )?;
    writeln!(doc, r"\address{{ {} }}", contact_line(details))?;
    writeln!(doc)?;
    writeln!(doc, r"\begin{{document}}")?;
    writeln!(doc)?;

    for section in sections.iter().filter(|s| s.visible) {
        render_section(&mut doc, &section.content)?;
    }

    writeln!(doc)?;
    writeln!(doc, r"\end{{document}}")?;
    Ok(doc)
}

/// Email, LinkedIn, GitHub, portfolio: in that order, skipping blanks.
pub fn contact_line(details: &BasicDetails) -> String {
    let mut parts = Vec::with_capacity(4);

    if !details.email.is_empty() {
        parts.push(format!(
            r"\href{{mailto:{}}}{{{}}}",
            details.email,
            escape(&details.email)
        ));
    }

    let links = [&details.linkedin, &details.github, &details.portfolio];
    for url in links.into_iter().flatten().filter(|u| !u.is_empty()) {
        parts.push(href(url, strip_scheme(url)));
    }

    parts.join(CONTACT_SEPARATOR)
}

/// Drops a single leading `http://` or `https://`, checked in that order.
fn strip_scheme(url: &str) -> &str {
    url.strip_prefix("http://")
        .or_else(|| url.strip_prefix("https://"))
        .unwrap_or(url)
}

/// `\href{target}{display}` with only the display text escaped.
fn href(target: &str, display: &str) -> String {
    format!(r"\href{{{}}}{{{}}}", target, escape(display))
}

fn render_section(doc: &mut String, content: &SectionContent) -> fmt::Result {
    match content {
        SectionContent::ProfileSummary(summary) => profile_summary(doc, summary),
        SectionContent::TechSkills(categories) => tech_skills(doc, categories),
        SectionContent::Experience(entries) => experience(doc, entries),
        SectionContent::Projects(entries) => projects(doc, entries),
        SectionContent::Volunteer(entries) => volunteer(doc, entries),
        SectionContent::Education(entries) => education(doc, entries),
        SectionContent::Malformed(_) | SectionContent::Unknown(_) => Ok(()),
    }
}

fn begin_section(doc: &mut String, title: &str) -> fmt::Result {
    writeln!(doc, r"\begin{{rSection}}{{{title}}}")?;
    writeln!(doc)
}

fn end_section(doc: &mut String) -> fmt::Result {
    writeln!(doc, r"\end{{rSection}}")?;
    writeln!(doc)
}

/// `indent` is the leading whitespace of the begin/end lines.
fn itemize(doc: &mut String, items: &[String], indent: &str) -> fmt::Result {
    writeln!(doc, r"{indent}\begin{{itemize}}")?;
    writeln!(doc, r"    \itemsep -3pt {{}}")?;
    for item in items {
        writeln!(doc, r"     \item {}", escape(item))?;
    }
    writeln!(doc, r"{indent}\end{{itemize}}")
}

fn profile_summary(doc: &mut String, summary: &ProfileSummary) -> fmt::Result {
    begin_section(doc, "OBJECTIVE")?;
    match summary.format {
        SummaryFormat::Paragraph => {
            writeln!(doc, "{{{}}}", escape(&summary.text))?;
            writeln!(doc)?;
        }
        SummaryFormat::Bullets => itemize(doc, &summary.bullets, "")?,
    }
    end_section(doc)
}

fn tech_skills(doc: &mut String, categories: &EntryList<SkillCategory>) -> fmt::Result {
    if categories.no_data() {
        return Ok(());
    }

    begin_section(doc, "SKILLS")?;
    writeln!(doc, r"\begin{{tabular}}{{ @{{}} >{{\bfseries}}l @{{\hspace{{6ex}}}} l }}")?;
    for category in categories.iter() {
        writeln!(
            doc,
            r"{} & {}\\",
            escape(&category.name),
            escape(&category.skills)
        )?;
    }
    writeln!(doc, r"\end{{tabular}}\\")?;
    end_section(doc)
}

/// Shared layout for experience and volunteer roles.
struct Role<'a> {
    title: &'a str,
    organization: &'a str,
    location: &'a str,
    start_date: &'a str,
    end_date: &'a str,
    bullets: &'a [String],
}

impl<'a> From<&'a ExperienceEntry> for Role<'a> {
    fn from(e: &'a ExperienceEntry) -> Self {
        Role {
            title: &e.title,
            organization: &e.company,
            location: &e.location,
            start_date: &e.start_date,
            end_date: &e.end_date,
            bullets: &e.bullets,
        }
    }
}

impl<'a> From<&'a VolunteerEntry> for Role<'a> {
    fn from(e: &'a VolunteerEntry) -> Self {
        Role {
            title: &e.title,
            organization: &e.organization,
            location: &e.location,
            start_date: &e.start_date,
            end_date: &e.end_date,
            bullets: &e.bullets,
        }
    }
}

fn experience(doc: &mut String, entries: &EntryList<ExperienceEntry>) -> fmt::Result {
    roles(doc, "EXPERIENCE", entries)
}

fn volunteer(doc: &mut String, entries: &EntryList<VolunteerEntry>) -> fmt::Result {
    roles(doc, "VOLUNTEER EXPERIENCE", entries)
}

fn roles<'a, T>(doc: &mut String, title: &str, entries: &'a EntryList<T>) -> fmt::Result
where
    Role<'a>: From<&'a T>,
{
    if entries.no_data() {
        return Ok(());
    }

    begin_section(doc, title)?;
    for role in entries.iter().map(Role::from) {
        writeln!(
            doc,
            r"\textbf{{{}}} \hfill {} - {}\\",
            escape(role.title),
            escape(role.start_date),
            escape(role.end_date)
        )?;
        writeln!(
            doc,
            r"{} \hfill \textit{{{}}}",
            escape(role.organization),
            escape(role.location)
        )?;
        if !role.bullets.is_empty() {
            itemize(doc, role.bullets, " ")?;
        }
        writeln!(doc)?;
    }
    end_section(doc)
}

fn projects(doc: &mut String, entries: &EntryList<ProjectEntry>) -> fmt::Result {
    if entries.no_data() {
        return Ok(());
    }

    begin_section(doc, "PROJECTS")?;
    for project in entries.iter() {
        write!(doc, r"\textbf{{{}}}", escape(&project.name))?;
        if let Some(link) = &project.link {
            write!(doc, " {}", href(link, "(Link)"))?;
        }
        if let Some(date) = &project.date {
            write!(doc, r" \hfill {}", escape(date))?;
        }
        writeln!(doc)?;

        if let Some(technologies) = &project.technologies {
            writeln!(doc, r"\\ \textit{{{}}}", escape(technologies))?;
        }

        if !project.description.is_empty() {
            writeln!(doc, r"\vspace{{-0.5em}}")?;
            itemize(doc, &project.description, " ")?;
        }
        writeln!(doc)?;
    }
    end_section(doc)
}

fn education(doc: &mut String, entries: &EntryList<EducationEntry>) -> fmt::Result {
    if entries.no_data() {
        return Ok(());
    }

    begin_section(doc, "Education")?;
    for entry in entries.iter() {
        let dates = match (entry.start_date.is_empty(), entry.end_date.is_empty()) {
            (false, false) => format!("{} - {}", entry.start_date, entry.end_date),
            (false, true) => entry.start_date.clone(),
            _ => entry.end_date.clone(),
        };
        writeln!(
            doc,
            r"{{\bf {}}}, {} \hfill {{{}}}\\",
            escape(&entry.degree),
            escape(&entry.institution),
            escape(&dates)
        )?;
    }
    writeln!(doc)?;
    end_section(doc)
}
