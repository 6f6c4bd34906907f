//! Contact inquiries submitted from the contact page.
//!
//! Inquiries are written once by the public form and afterwards only read
//! or deleted from the admin panel.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::types::{DbId, Timestamp};

/// Status given to every inquiry on submission.
pub const STATUS_NEW: &str = "new";

/// What the visitor wants built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectType {
    #[serde(alias = "cocina")]
    Kitchen,
    #[serde(alias = "dormitorio")]
    Bedroom,
    #[serde(alias = "living")]
    LivingRoom,
    #[serde(alias = "oficina")]
    Office,
    #[serde(alias = "baño", alias = "bano")]
    Bathroom,
    #[serde(alias = "otro")]
    Other,
}

impl ProjectType {
    pub fn as_str(self) -> &'static str {
        match self {
            ProjectType::Kitchen => "kitchen",
            ProjectType::Bedroom => "bedroom",
            ProjectType::LivingRoom => "living-room",
            ProjectType::Office => "office",
            ProjectType::Bathroom => "bathroom",
            ProjectType::Other => "other",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ProjectType::Kitchen => "Cocina Integral",
            ProjectType::Bedroom => "Dormitorio",
            ProjectType::LivingRoom => "Living/Comedor",
            ProjectType::Office => "Oficina/Estudio",
            ProjectType::Bathroom => "Muebles de Baño",
            ProjectType::Other => "Otro proyecto",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        serde_json::from_value(serde_json::Value::String(name.to_string())).ok()
    }
}

/// Budget bracket picked on the contact form (ARS).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BudgetRange {
    #[serde(rename = "up-to-100k", alias = "hasta-100k")]
    UpTo100k,
    #[serde(rename = "100k-300k")]
    From100kTo300k,
    #[serde(rename = "300k-500k")]
    From300kTo500k,
    #[serde(rename = "500k-1m")]
    From500kTo1m,
    #[serde(rename = "over-1m", alias = "mas-1m")]
    Over1m,
    #[serde(rename = "ask", alias = "consultar")]
    Ask,
}

impl BudgetRange {
    pub fn as_str(self) -> &'static str {
        match self {
            BudgetRange::UpTo100k => "up-to-100k",
            BudgetRange::From100kTo300k => "100k-300k",
            BudgetRange::From300kTo500k => "300k-500k",
            BudgetRange::From500kTo1m => "500k-1m",
            BudgetRange::Over1m => "over-1m",
            BudgetRange::Ask => "ask",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            BudgetRange::UpTo100k => "Hasta $100.000",
            BudgetRange::From100kTo300k => "$100.000 - $300.000",
            BudgetRange::From300kTo500k => "$300.000 - $500.000",
            BudgetRange::From500kTo1m => "$500.000 - $1.000.000",
            BudgetRange::Over1m => "Más de $1.000.000",
            BudgetRange::Ask => "Prefiero consultar",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        serde_json::from_value(serde_json::Value::String(name.to_string())).ok()
    }
}

/// A stored inquiry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactInquiry {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub project_type: ProjectType,
    pub budget: Option<BudgetRange>,
    pub message: String,
    pub timestamp: Timestamp,
    pub status: String,
}

/// Contact form payload.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewInquiry {
    #[validate(length(min = 2, message = "must be at least 2 characters"))]
    pub name: String,
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub project_type: ProjectType,
    #[serde(default)]
    pub budget: Option<BudgetRange>,
    #[validate(length(min = 10, message = "must be at least 10 characters"))]
    pub message: String,
}

impl NewInquiry {
    /// Trim free-text fields and turn a blank phone into `None`.
    pub fn normalized(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self.email = self.email.trim().to_string();
        self.message = self.message.trim().to_string();
        self.phone = self
            .phone
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty());
        self
    }
}
