//! Printable HTML rendering of a resume in one of the three templates.
//!
//! Output is a self-contained page (inline CSS, no scripts) meant to be
//! printed or saved as PDF by the caller's browser.

pub mod labels;

use crate::models::resume::{EducationEntry, ExperienceEntry, ResumeDocument, TemplateKind};
use crate::render::labels::{labels_for, Labels};
use crate::store::Snapshot;

const MODERN_CSS: &str = "body{font-family:Helvetica,Arial,sans-serif;color:#222;margin:2rem}\
h1{color:#1e3a8a;font-size:2rem;margin:0}\
h2.title{color:#555;font-weight:normal;margin:.25rem 0}\
.contact span{margin-inline-end:1rem;font-size:.85rem}\
section h2{border-bottom:2px solid #1e3a8a;font-size:1.1rem;padding-bottom:.25rem}\
.row{display:flex;justify-content:space-between}\
.org{color:#1e3a8a}.skills span{background:#eef;border-radius:1rem;padding:.2rem .6rem;margin:.2rem;display:inline-block;font-size:.75rem}";

const CLASSIC_CSS: &str = "body{font-family:Georgia,serif;color:#111;margin:2rem}\
header{text-align:center}\
h1{text-transform:uppercase;letter-spacing:.1em;font-size:1.6rem;margin:0}\
.contact span{margin:0 .5rem;font-size:.85rem}\
section h2{text-transform:uppercase;border-bottom:1px solid #999;font-size:1.05rem}\
.row{display:flex;justify-content:space-between}.role{font-style:italic}";

const MINIMAL_CSS: &str = "body{font-family:Helvetica,Arial,sans-serif;font-weight:300;color:#333;margin:2rem}\
header{border-bottom:1px solid #ddd;padding-bottom:1rem}\
h1{font-weight:300;font-size:2rem;margin:0}\
.contact span{margin-inline-end:1.5rem;font-size:.85rem;color:#666}\
section h2{font-weight:300;text-transform:uppercase;letter-spacing:.15em;font-size:1rem}\
.row{display:flex;justify-content:space-between;color:#666}";

/// Page title used when printing: `<name or "Resume">_<date>`.
pub fn document_title(doc: &ResumeDocument, labels: &Labels, date: &str) -> String {
    let name = doc.personal_info.full_name.trim();
    let name = if name.is_empty() { labels.untitled } else { name };
    format!("{name}_{date}")
}

/// Renders the selected template against the document.
pub fn render_html(snapshot: &Snapshot, date: &str) -> String {
    let doc = &snapshot.document;
    let labels = labels_for(snapshot.language);
    let css = match snapshot.template {
        TemplateKind::Modern => MODERN_CSS,
        TemplateKind::Classic => CLASSIC_CSS,
        TemplateKind::Minimal => MINIMAL_CSS,
    };

    let mut html = String::from("<!DOCTYPE html>\n");
    html.push_str(&format!(
        "<html lang=\"{}\" dir=\"{}\">\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n<style>{css}</style>\n</head>\n",
        labels.code,
        if labels.right_to_left { "rtl" } else { "ltr" },
        escape(&document_title(doc, &labels, date)),
    ));
    html.push_str(&format!(
        "<body class=\"template-{}\">\n",
        snapshot.template.as_str()
    ));

    render_header(&mut html, doc);

    if !doc.summary.trim().is_empty() {
        let heading = match snapshot.template {
            TemplateKind::Minimal => labels.about,
            TemplateKind::Modern | TemplateKind::Classic => labels.summary,
        };
        html.push_str(&format!(
            "<section class=\"summary\">\n<h2>{}</h2>\n<p>{}</p>\n</section>\n",
            escape(heading),
            escape(&doc.summary)
        ));
    }

    if !doc.experience.is_empty() {
        html.push_str(&format!(
            "<section class=\"experience\">\n<h2>{}</h2>\n",
            escape(labels.experience)
        ));
        for entry in &doc.experience {
            render_experience(&mut html, entry, snapshot.template, &labels);
        }
        html.push_str("</section>\n");
    }

    if !doc.education.is_empty() {
        html.push_str(&format!(
            "<section class=\"education\">\n<h2>{}</h2>\n",
            escape(labels.education)
        ));
        for entry in &doc.education {
            render_education(&mut html, entry, &labels);
        }
        html.push_str("</section>\n");
    }

    if !doc.skills.is_empty() {
        html.push_str(&format!(
            "<section class=\"skills\">\n<h2>{}</h2>\n<div>",
            escape(labels.skills)
        ));
        for skill in &doc.skills {
            html.push_str(&format!("<span>{}</span>", escape(skill)));
        }
        html.push_str("</div>\n</section>\n");
    }

    html.push_str("</body>\n</html>\n");
    html
}

fn render_header(html: &mut String, doc: &ResumeDocument) {
    let info = &doc.personal_info;
    html.push_str("<header>\n");
    html.push_str(&format!("<h1>{}</h1>\n", escape(&info.full_name)));
    if !info.title.is_empty() {
        html.push_str(&format!("<h2 class=\"title\">{}</h2>\n", escape(&info.title)));
    }

    let contacts = [
        Some(info.email.as_str()),
        Some(info.phone.as_str()),
        Some(info.location.as_str()),
        info.linkedin.as_deref(),
        info.website.as_deref(),
    ];
    html.push_str("<div class=\"contact\">");
    for value in contacts.into_iter().flatten().filter(|v| !v.is_empty()) {
        html.push_str(&format!("<span>{}</span>", escape(value)));
    }
    html.push_str("</div>\n</header>\n");
}

fn date_range(start: &str, end: &str, ongoing: bool, labels: &Labels) -> String {
    let end = if ongoing { labels.present } else { end };
    format!("{} - {}", escape(start), escape(end))
}

fn render_experience(
    html: &mut String,
    entry: &ExperienceEntry,
    template: TemplateKind,
    labels: &Labels,
) {
    let dates = date_range(
        &entry.start_date,
        &entry.end_date,
        entry.is_current_position,
        labels,
    );
    let location = entry.location.as_deref().unwrap_or_default();

    html.push_str("<div class=\"entry\">\n");
    match template {
        TemplateKind::Modern => {
            html.push_str(&format!(
                "<div class=\"row\"><strong>{}</strong><span>{dates}</span></div>\n",
                escape(&entry.position)
            ));
            html.push_str(&format!(
                "<div class=\"row\"><span class=\"org\">{}</span><span>{}</span></div>\n",
                escape(&entry.company),
                escape(location)
            ));
        }
        TemplateKind::Classic => {
            html.push_str(&format!(
                "<div class=\"row\"><strong>{}</strong><span>{dates}</span></div>\n",
                escape(&entry.company)
            ));
            html.push_str(&format!(
                "<div class=\"row role\"><span>{}</span><span>{}</span></div>\n",
                escape(&entry.position),
                escape(location)
            ));
        }
        TemplateKind::Minimal => {
            let company = if location.is_empty() {
                escape(&entry.company)
            } else {
                format!("{}, {}", escape(&entry.company), escape(location))
            };
            html.push_str(&format!("<h3>{}</h3>\n", escape(&entry.position)));
            html.push_str(&format!(
                "<div class=\"row\"><span>{company}</span><span>{dates}</span></div>\n"
            ));
        }
    }
    if !entry.description.is_empty() {
        html.push_str(&format!("<p>{}</p>\n", escape(&entry.description)));
    }
    html.push_str("</div>\n");
}

fn render_education(html: &mut String, entry: &EducationEntry, labels: &Labels) {
    let dates = date_range(
        &entry.start_date,
        &entry.end_date,
        entry.is_currently_studying,
        labels,
    );
    let degree = if entry.field.is_empty() {
        escape(&entry.degree)
    } else {
        format!("{}, {}", escape(&entry.degree), escape(&entry.field))
    };

    html.push_str("<div class=\"entry\">\n");
    html.push_str(&format!(
        "<div class=\"row\"><strong>{degree}</strong><span>{dates}</span></div>\n"
    ));
    html.push_str(&format!(
        "<div class=\"row\"><span class=\"org\">{}</span><span>{}</span></div>\n",
        escape(&entry.institution),
        escape(entry.location.as_deref().unwrap_or_default())
    ));
    if let Some(gpa) = entry.gpa.as_deref().filter(|g| !g.is_empty()) {
        html.push_str(&format!("<p>{}: {}</p>\n", escape(labels.gpa), escape(gpa)));
    }
    if let Some(description) = entry.description.as_deref().filter(|d| !d.is_empty()) {
        html.push_str(&format!("<p>{}</p>\n", escape(description)));
    }
    html.push_str("</div>\n");
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
