use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Años que cubre el corpus 20090715.
pub const MIN_YEAR: i32 = 1700;
pub const MAX_YEAR: i32 = 2008;

pub const MIN_PERCENT_OF_YEARS: f64 = 0.1;
pub const MAX_PERCENT_OF_YEARS: f64 = 1.0;

pub const MIN_CLUSTER_SIZE: i32 = 1;
pub const MAX_CLUSTER_SIZE: i32 = 20;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("windowSize must be at least 1 (got {window_size})")]
    WindowTooSmall { window_size: i32 },

    #[error("fromYear and toYear must be between 1700 and 2008 (got {from_year}..{to_year})")]
    YearOutOfRange { from_year: i32, to_year: i32 },

    #[error("fromYear must be less than toYear (got {from_year} >= {to_year})")]
    EmptyYearRange { from_year: i32, to_year: i32 },

    #[error(
        "there are not enough years to shift the window: fromYear + windowSize must not exceed toYear \
         ({from_year} + {window_size} > {to_year})"
    )]
    WindowDoesNotFit {
        from_year: i32,
        to_year: i32,
        window_size: i32,
    },

    #[error("percentOfYears must be between 0.1 and 1.0 (got {percent_of_years})")]
    PercentOutOfRange { percent_of_years: f64 },

    #[error("cluster size must be between 1 and 20 (got {size})")]
    ClusterSizeOutOfRange { size: i32 },
}

/// Rango de años y ventana deslizante ya validados.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearWindow {
    pub from_year: i32,
    pub to_year: i32,
    pub window_size: i32,
}

impl YearWindow {
    /// Año en que termina la primera ventana.
    pub fn first_window_end(&self) -> i32 {
        self.from_year + self.window_size
    }

    /// Años en los que termina cada corrimiento: `fromYear + windowSize ..= toYear`.
    pub fn shift_years(&self) -> std::ops::RangeInclusive<i32> {
        self.first_window_end()..=self.to_year
    }

    pub fn shift_count(&self) -> usize {
        self.shift_years().count()
    }
}

/// Valores que ingresa el usuario para una corrida.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunParameters {
    pub language1: String,
    pub language2: String,
    pub master_instance_type: String,
    pub slave_instance_type: String,
    pub from_year: i32,
    pub to_year: i32,
    pub window_size: i32,
    pub percent_of_years: f64,
}

impl RunParameters {
    /// Corta en la primera regla que no se cumple.
    pub fn validate(&self) -> Result<YearWindow, ValidationError> {
        match self.violations().into_iter().next() {
            Some(err) => Err(err),
            None => Ok(self.window()),
        }
    }

    /// Todas las reglas que no se cumplen, en el mismo orden en que las
    /// revisa `validate`.
    pub fn violations(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        let (from_year, to_year, window_size) = (self.from_year, self.to_year, self.window_size);

        if window_size < 1 {
            errors.push(ValidationError::WindowTooSmall { window_size });
        }
        let year_range = MIN_YEAR..=MAX_YEAR;
        if !year_range.contains(&from_year) || !year_range.contains(&to_year) {
            errors.push(ValidationError::YearOutOfRange { from_year, to_year });
        }
        if from_year >= to_year {
            errors.push(ValidationError::EmptyYearRange { from_year, to_year });
        }
        if from_year.saturating_add(window_size) > to_year {
            errors.push(ValidationError::WindowDoesNotFit {
                from_year,
                to_year,
                window_size,
            });
        }
        // NaN tampoco pasa
        if !(MIN_PERCENT_OF_YEARS..=MAX_PERCENT_OF_YEARS).contains(&self.percent_of_years) {
            errors.push(ValidationError::PercentOutOfRange {
                percent_of_years: self.percent_of_years,
            });
        }

        errors
    }

    pub fn window(&self) -> YearWindow {
        YearWindow {
            from_year: self.from_year,
            to_year: self.to_year,
            window_size: self.window_size,
        }
    }

    pub fn table1(&self) -> String {
        crate::layout::table_name(&self.language1)
    }

    pub fn table2(&self) -> String {
        crate::layout::table_name(&self.language2)
    }

    /// Si los dos idiomas son iguales solo se buscan neologismos.
    pub fn compares_languages(&self) -> bool {
        self.language1 != self.language2
    }
}

pub fn validate_cluster_size(size: i32) -> Result<u32, ValidationError> {
    if (MIN_CLUSTER_SIZE..=MAX_CLUSTER_SIZE).contains(&size) {
        u32::try_from(size).map_err(|_| ValidationError::ClusterSizeOutOfRange { size })
    } else {
        Err(ValidationError::ClusterSizeOutOfRange { size })
    }
}
