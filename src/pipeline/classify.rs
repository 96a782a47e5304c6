//! Specialty classification: cleaned text to exactly one category.
//!
//! A fixed, ordered table of `(Category, trigger patterns)` pairs is tested
//! against the upper-cased text; the first category with any matching
//! pattern wins. Table order is a priority ranking — LABORATORIO outranks
//! HISTORIA CLINICA, which outranks the catch-all — so a lab report that
//! happens to mention the clinical history still files under LABORATORIO.
//!
//! The function is pure, total, and deterministic: any input, including the
//! empty string, yields a category ([`Category::Otros`] when nothing
//! matches).

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed set of medical-exam specialties used to group findings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Laboratorio,
    Cardiologia,
    Audiologia,
    Dermatologia,
    EcografiaAbdominal,
    EcografiaPelvica,
    HistoriaClinica,
    MusculoEsqueletico,
    Neurologia,
    Odontologia,
    Oftalmologia,
    PruebaDeEsfuerzo,
    Psicologia,
    Urologia,
    Radiologia,
    Espirometria,
    /// Catch-all for documents matching no specialty.
    Otros,
}

impl Category {
    /// Canonical display name, as used in corpus headers and audit files.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Laboratorio => "LABORATORIO",
            Category::Cardiologia => "CARDIOLOGIA",
            Category::Audiologia => "AUDIOLOGIA",
            Category::Dermatologia => "DERMATOLOGIA",
            Category::EcografiaAbdominal => "ECOGRAFIA ABDOMINAL",
            Category::EcografiaPelvica => "ECOGRAFIA PELVICA",
            Category::HistoriaClinica => "HISTORIA CLINICA",
            Category::MusculoEsqueletico => "MUSCULO ESQUELETICO",
            Category::Neurologia => "NEUROLOGIA",
            Category::Odontologia => "ODONTOLOGIA",
            Category::Oftalmologia => "OFTALMOLOGIA",
            Category::PruebaDeEsfuerzo => "PRUEBA DE ESFUERZO",
            Category::Psicologia => "PSICOLOGIA",
            Category::Urologia => "UROLOGIA",
            Category::Radiologia => "RADIOLOGIA",
            Category::Espirometria => "ESPIROMETRIA",
            Category::Otros => "OTROS",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Priority-ordered trigger table. Patterns match against upper-cased text,
/// so they are written in upper case with no `(?i)`.
static CATEGORY_RULES: Lazy<Vec<(Category, Vec<Regex>)>> = Lazy::new(|| {
    let table: &[(Category, &[&str])] = &[
        (
            Category::Laboratorio,
            &[
                r"INFORME DE LABORATORIO",
                r"EXAMEN DE LABORATORIO",
                r"HEMOGRAMA",
                r"BIOQUIMICA",
            ],
        ),
        (
            Category::Cardiologia,
            &[r"ELECTROCARDIOGRAF", r"CARDIOVASCULAR", r"EKG"],
        ),
        (
            Category::Audiologia,
            &[r"AUDIOL", r"OTOSCOPIA", r"OTORRINO"],
        ),
        (Category::Dermatologia, &[r"DERMATOL"]),
        (Category::EcografiaAbdominal, &[r"ECOGRAF(IA|ICA)\s+ABDOM"]),
        (Category::EcografiaPelvica, &[r"ECOGRAF(IA|ICA)\s+PELV"]),
        (
            Category::HistoriaClinica,
            &[r"HISTORIA CLINICA MEDICA OCUPACIONAL", r"HISTORIA CL[IÍ]NICA"],
        ),
        (
            Category::MusculoEsqueletico,
            &[r"MUSCULO", r"ESQUEL[EÉ]TICA"],
        ),
        (Category::Neurologia, &[r"NEUROL"]),
        (Category::Odontologia, &[r"ODONTO", r"ODONTOGRAMA"]),
        (Category::Oftalmologia, &[r"OFTALMO"]),
        (
            Category::PruebaDeEsfuerzo,
            &[r"PRUEBA DE ESFUERZO", r"PROTOCOLO BRUCE"],
        ),
        (Category::Psicologia, &[r"PSICOL", r"EPWORTH"]),
        (Category::Urologia, &[r"UROL"]),
        (Category::Radiologia, &[r"RADIOGRA", r"TÓRAX"]),
        (Category::Espirometria, &[r"ESPIROM"]),
    ];

    table
        .iter()
        .map(|(cat, pats)| {
            let compiled = pats
                .iter()
                .map(|p| Regex::new(p).expect("category pattern must compile"))
                .collect();
            (*cat, compiled)
        })
        .collect()
});

/// Classify a cleaned text into exactly one specialty.
pub fn classify(text: &str) -> Category {
    let upper = text.to_uppercase();
    for (category, patterns) in CATEGORY_RULES.iter() {
        if patterns.iter().any(|p| p.is_match(&upper)) {
            return *category;
        }
    }
    Category::Otros
}
