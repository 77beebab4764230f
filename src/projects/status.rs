use chrono::{DateTime, Datelike, Utc};

const SPANISH_MONTHS: [&str; 12] = [
    "ene", "feb", "mar", "abr", "may", "jun", "jul", "ago", "sept", "oct", "nov", "dic",
];

pub fn format_month_year(date: DateTime<Utc>) -> String {
    let month = SPANISH_MONTHS[date.month0() as usize];
    format!("{month} {}", date.year())
}

pub fn format_millis(millis: i64) -> String {
    DateTime::from_timestamp_millis(millis)
        .map(format_month_year)
        .unwrap_or_default()
}

pub fn format_optional(date: Option<DateTime<Utc>>) -> String {
    date.map(format_month_year).unwrap_or_default()
}

/// What the status line under the gallery reports.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadStatus {
    Requesting,
    ShowingCache { saved_at: Option<i64> },
    Updated { at: i64 },
    UpdatedEmpty,
    RateLimitedShowingCache,
    RateLimited,
    UpdateFailedShowingCache,
    Failed,
}

impl LoadStatus {
    pub fn message(&self) -> String {
        match self {
            Self::Requesting => "Solicitando proyectos a GitHub…".to_string(),
            Self::ShowingCache { saved_at: Some(at) } => format!(
                "Mostrando datos guardados. Última actualización: {}.",
                format_millis(*at)
            ),
            Self::ShowingCache { saved_at: None } => "Mostrando datos guardados.".to_string(),
            Self::Updated { at } => format!("Actualizado: {}.", format_millis(*at)),
            Self::UpdatedEmpty => "Sin repos públicos para mostrar.".to_string(),
            Self::RateLimitedShowingCache => {
                "GitHub limit alcanzado. Mostrando caché; vuelve a intentar en unos minutos."
                    .to_string()
            }
            Self::RateLimited => "GitHub limit alcanzado. Intenta de nuevo en unos minutos.".to_string(),
            Self::UpdateFailedShowingCache => {
                "No se pudo actualizar. Mostrando la última versión guardada.".to_string()
            }
            Self::Failed => {
                "No se pudieron cargar los proyectos (revisa usuario o límite de API).".to_string()
            }
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(
            self,
            Self::RateLimitedShowingCache
                | Self::RateLimited
                | Self::UpdateFailedShowingCache
                | Self::Failed
        )
    }
}
