//! Built-in presets for the supported EMR vendors.

use std::fmt;
use std::str::FromStr;

use emr_ingest::ColumnAliases;

use super::SourcePreset;
use crate::error::ValidationError;
use crate::rules::RuleSet;

/// Canonical column name followed by the alternative headers it may appear under.
type AliasTable = &'static [(&'static str, &'static [&'static str])];

const PATIENT_ALIASES: &[&str] = &["person_id", "pat_id", "patientid"];
const MRN_ALIASES: &[&str] = &["medical_record_num", "medical_record_number", "mrn_id"];
const VISIT_ALIASES: &[&str] = &["encounter_id", "enc_id"];
const DOB_ALIASES: &[&str] = &["birth_date", "date_of_birth"];
const GENDER_ALIASES: &[&str] = &["sex"];

const MEDITECH_ALIASES: AliasTable = &[
    ("patient_id", PATIENT_ALIASES),
    ("mrn", MRN_ALIASES),
    ("visit_id", VISIT_ALIASES),
    ("admit_date", &["admit_dt", "admit_datetime", "admission_date"]),
    ("discharge_date", &["discharge_dt", "discharge_datetime"]),
    ("icd_code", &["icd10_code", "diagnosis_code", "dx_code"]),
    ("cpt_code", &["procedure_code", "proc_code"]),
    ("dob", DOB_ALIASES),
    ("gender", GENDER_ALIASES),
];

const ALLSCRIPTS_ALIASES: AliasTable = &[
    ("patient_id", PATIENT_ALIASES),
    ("mrn", MRN_ALIASES),
    ("visit_id", VISIT_ALIASES),
    ("service_date", &["admit_date", "admit_dt", "service_dt"]),
    ("diagnosis_code", &["icd10_code", "icd_code", "dx_code"]),
    ("procedure_code", &["cpt_code", "proc_code"]),
    ("dob", DOB_ALIASES),
    ("gender", GENDER_ALIASES),
];

/// A supported EMR vendor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SourceSystem {
    Allscripts,
    Athenahealth,
    Cerner,
    Epic,
    Meditech,
}

impl SourceSystem {
    /// All systems, sorted by key.
    pub const ALL: [Self; 5] = [
        Self::Allscripts,
        Self::Athenahealth,
        Self::Cerner,
        Self::Epic,
        Self::Meditech,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Self::Allscripts => "allscripts",
            Self::Athenahealth => "athenahealth",
            Self::Cerner => "cerner",
            Self::Epic => "epic",
            Self::Meditech => "meditech",
        }
    }

    pub fn display(self) -> &'static str {
        match self {
            Self::Allscripts => "ALLSCRIPTS",
            Self::Athenahealth => "ATHENAHEALTH",
            Self::Cerner => "CERNER",
            Self::Epic => "EPIC",
            Self::Meditech => "MEDITECH",
        }
    }

    fn required_columns(self) -> &'static [&'static str] {
        match self {
            Self::Epic => &[
                "patient_id",
                "mrn",
                "encounter_id",
                "admit_datetime",
                "discharge_datetime",
                "diagnosis_code",
                "procedure_code",
                "dob",
                "sex",
            ],
            Self::Cerner => &[
                "person_id",
                "mrn",
                "encounter_id",
                "admit_dt",
                "discharge_dt",
                "icd10_code",
                "cpt_code",
                "birth_date",
                "sex",
            ],
            Self::Meditech => &[
                "patient_id",
                "mrn",
                "visit_id",
                "admit_date",
                "discharge_date",
                "icd_code",
                "cpt_code",
                "dob",
                "gender",
            ],
            Self::Allscripts => &[
                "patient_id",
                "mrn",
                "visit_id",
                "service_date",
                "diagnosis_code",
                "procedure_code",
                "dob",
                "gender",
            ],
            Self::Athenahealth => &[
                "patient_id",
                "mrn",
                "encounter_id",
                "service_date",
                "diagnosis_code",
                "procedure_code",
                "dob",
                "sex",
            ],
        }
    }

    fn not_null_columns(self) -> &'static [&'static str] {
        match self {
            Self::Epic | Self::Athenahealth => &["patient_id", "mrn", "encounter_id", "diagnosis_code"],
            Self::Cerner => &["person_id", "mrn", "encounter_id", "icd10_code"],
            Self::Meditech => &["patient_id", "mrn", "visit_id", "icd_code"],
            Self::Allscripts => &["patient_id", "mrn", "visit_id", "diagnosis_code"],
        }
    }

    fn unique_columns(self) -> &'static [&'static str] {
        match self {
            Self::Epic | Self::Cerner | Self::Athenahealth => &["encounter_id"],
            Self::Meditech | Self::Allscripts => &["visit_id"],
        }
    }

    fn alias_table(self) -> AliasTable {
        match self {
            Self::Meditech => MEDITECH_ALIASES,
            Self::Allscripts => ALLSCRIPTS_ALIASES,
            Self::Epic | Self::Cerner | Self::Athenahealth => &[],
        }
    }

    pub fn aliases(self) -> ColumnAliases {
        self.alias_table()
            .iter()
            .map(|(canonical, alternatives)| {
                (
                    (*canonical).to_string(),
                    alternatives.iter().map(|alias| (*alias).to_string()).collect(),
                )
            })
            .collect()
    }

    pub fn preset(self) -> SourcePreset {
        let owned = |columns: &[&str]| columns.iter().map(|c| (*c).to_string()).collect();
        SourcePreset {
            key: self.key().to_string(),
            display: self.display().to_string(),
            required_columns: owned(self.required_columns()),
            not_null_columns: owned(self.not_null_columns()),
            unique_columns: owned(self.unique_columns()),
            aliases: self.aliases(),
        }
    }

    pub fn ruleset(self) -> RuleSet {
        self.preset().ruleset()
    }
}

impl fmt::Display for SourceSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for SourceSystem {
    type Err = ValidationError;

    /// Keys are matched after trimming, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|system| system.key() == key)
            .ok_or_else(|| ValidationError::UnknownSystem {
                system: s.to_string(),
                supported: supported_systems().join(", "),
            })
    }
}

/// Keys of every built-in system, sorted.
pub fn supported_systems() -> Vec<&'static str> {
    let mut keys: Vec<&'static str> = SourceSystem::ALL.iter().map(|system| system.key()).collect();
    keys.sort_unstable();
    keys
}

/// Rule set for a system key such as `"epic"`.
pub fn ruleset_for(system: &str) -> Result<RuleSet, ValidationError> {
    Ok(system.parse::<SourceSystem>()?.ruleset())
}
