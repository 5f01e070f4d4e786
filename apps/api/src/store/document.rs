//! Pure document transforms. Every operation consumes the current document and
//! returns the next one; the store swaps the result in atomically.
//!
//! Updates and removals that name an unknown entry id return the document
//! unchanged.

use uuid::Uuid;

use crate::models::resume::{
    EducationEntry, EducationPatch, ExperienceEntry, ExperiencePatch, NewEducation, NewExperience,
    PersonalInfoPatch, ResumeDocument, PRESENT,
};

/// Opaque, locally generated entry id.
pub fn new_entry_id() -> String {
    format!("id_{}", Uuid::new_v4().simple())
}

impl ResumeDocument {
    #[must_use]
    pub fn with_personal_info(mut self, patch: PersonalInfoPatch) -> Self {
        let info = &mut self.personal_info;
        merge(&mut info.full_name, patch.full_name);
        merge(&mut info.email, patch.email);
        merge(&mut info.phone, patch.phone);
        merge(&mut info.location, patch.location);
        merge(&mut info.title, patch.title);
        if patch.linkedin.is_some() {
            info.linkedin = patch.linkedin;
        }
        if patch.website.is_some() {
            info.website = patch.website;
        }
        self
    }

    #[must_use]
    pub fn with_summary(mut self, summary: String) -> Self {
        self.summary = summary;
        self
    }

    /// Prepends a new entry and returns its generated id alongside the document.
    #[must_use]
    pub fn with_new_experience(mut self, input: NewExperience) -> (Self, String) {
        let id = new_entry_id();
        let end_date = if input.is_current_position {
            PRESENT.to_string()
        } else {
            input.end_date
        };
        let entry = ExperienceEntry {
            id: id.clone(),
            company: input.company,
            position: input.position,
            start_date: input.start_date,
            end_date,
            is_current_position: input.is_current_position,
            description: input.description,
            location: input.location,
        };
        self.experience.insert(0, entry);
        (self, id)
    }

    #[must_use]
    pub fn with_experience_update(mut self, id: &str, patch: ExperiencePatch) -> Self {
        if let Some(entry) = self.experience.iter_mut().find(|e| e.id == id) {
            merge(&mut entry.company, patch.company);
            merge(&mut entry.position, patch.position);
            merge(&mut entry.start_date, patch.start_date);
            merge(&mut entry.description, patch.description);
            if patch.location.is_some() {
                entry.location = patch.location;
            }
            apply_current_flag(
                &mut entry.is_current_position,
                &mut entry.end_date,
                patch.is_current_position,
                patch.end_date,
            );
        }
        self
    }

    #[must_use]
    pub fn without_experience(mut self, id: &str) -> Self {
        self.experience.retain(|e| e.id != id);
        self
    }

    #[must_use]
    pub fn with_new_education(mut self, input: NewEducation) -> (Self, String) {
        let id = new_entry_id();
        let end_date = if input.is_currently_studying {
            PRESENT.to_string()
        } else {
            input.end_date
        };
        let entry = EducationEntry {
            id: id.clone(),
            institution: input.institution,
            degree: input.degree,
            field: input.field,
            start_date: input.start_date,
            end_date,
            is_currently_studying: input.is_currently_studying,
            description: input.description,
            location: input.location,
            gpa: input.gpa,
        };
        self.education.insert(0, entry);
        (self, id)
    }

    #[must_use]
    pub fn with_education_update(mut self, id: &str, patch: EducationPatch) -> Self {
        if let Some(entry) = self.education.iter_mut().find(|e| e.id == id) {
            merge(&mut entry.institution, patch.institution);
            merge(&mut entry.degree, patch.degree);
            merge(&mut entry.field, patch.field);
            merge(&mut entry.start_date, patch.start_date);
            if patch.description.is_some() {
                entry.description = patch.description;
            }
            if patch.location.is_some() {
                entry.location = patch.location;
            }
            if patch.gpa.is_some() {
                entry.gpa = patch.gpa;
            }
            apply_current_flag(
                &mut entry.is_currently_studying,
                &mut entry.end_date,
                patch.is_currently_studying,
                patch.end_date,
            );
        }
        self
    }

    #[must_use]
    pub fn without_education(mut self, id: &str) -> Self {
        self.education.retain(|e| e.id != id);
        self
    }

    /// Replaces the skill set, dropping blanks and repeated values.
    #[must_use]
    pub fn with_skills(mut self, skills: Vec<String>) -> Self {
        self.skills = dedup_skills(Vec::new(), skills);
        self
    }

    /// Merges comma-separated input into the existing skills.
    #[must_use]
    pub fn with_added_skills(mut self, input: &str) -> Self {
        let existing = std::mem::take(&mut self.skills);
        self.skills = dedup_skills(existing, split_skill_input(input));
        self
    }

    #[must_use]
    pub fn without_skill(mut self, skill: &str) -> Self {
        self.skills.retain(|s| s != skill);
        self
    }

    /// Repairs a document that did not come from these transforms (import,
    /// local mirror, remote row): fresh ids for missing or repeated ones,
    /// `Present` as the end date of every ongoing entry, deduplicated skills.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        let mut seen = std::collections::HashSet::new();
        for entry in &mut self.experience {
            if entry.id.is_empty() || !seen.insert(entry.id.clone()) {
                entry.id = new_entry_id();
                seen.insert(entry.id.clone());
            }
            if entry.is_current_position {
                entry.end_date = PRESENT.to_string();
            }
        }
        for entry in &mut self.education {
            if entry.id.is_empty() || !seen.insert(entry.id.clone()) {
                entry.id = new_entry_id();
                seen.insert(entry.id.clone());
            }
            if entry.is_currently_studying {
                entry.end_date = PRESENT.to_string();
            }
        }
        self.skills = dedup_skills(Vec::new(), std::mem::take(&mut self.skills));
        self
    }

    /// Name and email are both required before the resume may be exported or
    /// shared. Whitespace-only values count as missing.
    pub fn is_exportable(&self) -> bool {
        !self.personal_info.full_name.trim().is_empty()
            && !self.personal_info.email.trim().is_empty()
    }
}

fn merge(field: &mut String, value: Option<String>) {
    if let Some(v) = value {
        *field = v;
    }
}

/// Keeps `end_date` consistent with the "ongoing" flag.
///
/// Turning the flag on forces `Present`. Turning it off clears the end date
/// unless the same update supplies one. While the flag stays on, end-date
/// updates are ignored.
fn apply_current_flag(
    flag: &mut bool,
    end_date: &mut String,
    new_flag: Option<bool>,
    new_end_date: Option<String>,
) {
    match new_flag {
        Some(true) => {
            *flag = true;
            *end_date = PRESENT.to_string();
        }
        Some(false) => {
            *flag = false;
            *end_date = new_end_date.unwrap_or_default();
        }
        None if !*flag => merge(end_date, new_end_date),
        None => {}
    }
}

fn split_skill_input(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn dedup_skills(mut base: Vec<String>, incoming: Vec<String>) -> Vec<String> {
    let mut seen: std::collections::HashSet<String> = base.iter().cloned().collect();
    base.retain(|s| !s.trim().is_empty());
    for skill in incoming {
        let skill = skill.trim().to_string();
        if !skill.is_empty() && seen.insert(skill.clone()) {
            base.push(skill);
        }
    }
    base
}
