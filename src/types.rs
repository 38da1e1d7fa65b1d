use serde::{Deserialize, Serialize};
use tabled::Tabled;

/// Status value that marks a project as approved.
pub const APPROVED: &str = "Aprobado";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Validado {
    #[serde(rename = "")]
    Empty,
    #[serde(rename = "Validado")]
    Validado,
}

/// The two review categories the dashboard segments by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectKind {
    Dia,
    Eia,
}

impl ProjectKind {
    pub fn from_tipo(tipo: &str) -> Option<Self> {
        match tipo {
            "DIA" => Some(ProjectKind::Dia),
            "EIA" => Some(ProjectKind::Eia),
            _ => None,
        }
    }
}

/// One environmental-impact review project as it appears in the dataset.
///
/// Field names follow the dataset keys so the same struct deserializes the
/// JSON export and a CSV with matching headers.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Project {
    pub id: i64,
    pub id_expediente: i64,
    pub nombre: String,
    pub tipo: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub tipologia: String,
    #[serde(default)]
    pub titular: String,
    pub sub_tipologia: Option<String>,
    #[serde(default)]
    pub inversion: String,
    pub fecha: String,
    pub fecha_termino: Option<String>,
    #[serde(default)]
    pub estado: String,
    pub dias_evaluacion: Option<i64>,
    pub dias_suspension: Option<i64>,
    pub potencia: Option<f64>,
    pub comuna: Option<String>,
    pub x: Option<String>,
    pub y: Option<String>,
    pub validado: Option<Validado>,
    pub cant_relacionados: Option<i64>,
    pub fecha_resolucion: Option<String>,
    pub nro_resolucion: Option<String>,
    pub descripcion_detalle: Option<String>,
    pub encargado_detalle: Option<String>,
}

impl Project {
    pub fn is_approved(&self) -> bool {
        self.estado == APPROVED
    }

    pub fn kind(&self) -> Option<ProjectKind> {
        ProjectKind::from_tipo(&self.tipo)
    }

    /// Resolution date, treating an empty string the same as a missing one.
    pub fn resolution_date(&self) -> Option<&str> {
        self.fecha_resolucion.as_deref().filter(|s| !s.is_empty())
    }
}

// Chart series. Every vector is aligned by index with `years`.

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AdmitApprovChartData {
    pub years: Vec<String>,
    pub entered: Vec<usize>,
    pub approved: Vec<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InvestmentChartData {
    pub years: Vec<String>,
    pub dia_investments: Vec<f64>,
    pub eia_investments: Vec<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DiffTimeChartData {
    pub years: Vec<String>,
    pub dia_avg_days: Vec<i64>,
    pub eia_avg_days: Vec<i64>,
}

/// Project holding the longest or shortest processing time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessingExtreme {
    pub project: String,
    pub id: i64,
    pub days: i64,
}

// Detail table rows.

#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct AnnualApprovalRow {
    #[serde(rename = "Year")]
    #[tabled(rename = "Year")]
    pub year: i32,
    #[serde(rename = "Entered")]
    #[tabled(rename = "Entered")]
    pub entered: usize,
    #[serde(rename = "Approved")]
    #[tabled(rename = "Approved")]
    pub approved: usize,
    #[serde(rename = "ApprovalRate")]
    #[tabled(rename = "ApprovalRate")]
    pub approval_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct AnnualInvestmentRow {
    #[serde(rename = "Year")]
    #[tabled(rename = "Year")]
    pub year: i32,
    #[serde(rename = "DiaInvestment")]
    #[tabled(rename = "DiaInvestment", display_with = "display_amount")]
    pub dia_investment: f64,
    #[serde(rename = "EiaInvestment")]
    #[tabled(rename = "EiaInvestment", display_with = "display_amount")]
    pub eia_investment: f64,
    #[serde(rename = "TotalInvestment")]
    #[tabled(rename = "TotalInvestment", display_with = "display_amount")]
    pub total_investment: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct ProcessingTimeRow {
    #[serde(rename = "Id")]
    #[tabled(rename = "Id")]
    pub id: i64,
    #[serde(rename = "Name")]
    #[tabled(rename = "Name")]
    pub name: String,
    #[serde(rename = "Year")]
    #[tabled(rename = "Year", display_with = "display_optional")]
    pub year: Option<i32>,
    #[serde(rename = "Type")]
    #[tabled(rename = "Type")]
    pub project_type: String,
    #[serde(rename = "EntryDate")]
    #[tabled(rename = "EntryDate")]
    pub entry_date: String,
    #[serde(rename = "ResolutionDate")]
    #[tabled(rename = "ResolutionDate")]
    pub resolution_date: String,
    #[serde(rename = "ProcessingDays")]
    #[tabled(rename = "ProcessingDays", display_with = "display_optional")]
    pub processing_days: Option<i64>,
}

fn display_amount(v: &f64) -> String {
    crate::util::format_number(*v, 2)
}

fn display_optional<T: std::fmt::Display>(v: &Option<T>) -> String {
    match v {
        Some(v) => v.to_string(),
        None => "-".to_string(),
    }
}
