use crate::models::resume::Language;

/// Section headings and fixed words, per output language.
#[derive(Debug, Clone, Copy)]
pub struct Labels {
    pub summary: &'static str,
    pub about: &'static str,
    pub experience: &'static str,
    pub education: &'static str,
    pub skills: &'static str,
    pub present: &'static str,
    pub gpa: &'static str,
    pub untitled: &'static str,
    /// `lang` attribute value.
    pub code: &'static str,
    pub right_to_left: bool,
}

pub fn labels_for(language: Language) -> Labels {
    match language {
        Language::English => Labels {
            summary: "Professional Summary",
            about: "About",
            experience: "Experience",
            education: "Education",
            skills: "Skills",
            present: "Present",
            gpa: "GPA",
            untitled: "Resume",
            code: "en",
            right_to_left: false,
        },
        Language::French => Labels {
            summary: "Profil professionnel",
            about: "À propos",
            experience: "Expérience",
            education: "Formation",
            skills: "Compétences",
            present: "Présent",
            gpa: "Moyenne",
            untitled: "CV",
            code: "fr",
            right_to_left: false,
        },
        Language::Arabic => Labels {
            summary: "الملخص المهني",
            about: "نبذة",
            experience: "الخبرة",
            education: "التعليم",
            skills: "المهارات",
            present: "حتى الآن",
            gpa: "المعدل",
            untitled: "السيرة الذاتية",
            code: "ar",
            right_to_left: true,
        },
    }
}
