use serde::{Deserialize, Serialize};

/// Scripts de Hive que se suben a S3 antes de lanzar el job.
/// Van embebidos en el binario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HiveScript {
    ImportNgrams,
    CreateWindow,
    ShiftWindow,
    ExportDictionary,
    ExportForeignisms,
    ProcessNeologisms,
    ExportNeologisms,
}

impl HiveScript {
    /// En el orden en que se suben.
    pub const ALL: [HiveScript; 7] = [
        HiveScript::ImportNgrams,
        HiveScript::CreateWindow,
        HiveScript::ShiftWindow,
        HiveScript::ExportDictionary,
        HiveScript::ExportForeignisms,
        HiveScript::ProcessNeologisms,
        HiveScript::ExportNeologisms,
    ];

    pub fn file_name(&self) -> &'static str {
        match self {
            HiveScript::ImportNgrams => "ImportNgrams.q",
            HiveScript::CreateWindow => "CreateWindow.q",
            HiveScript::ShiftWindow => "ShiftWindow.q",
            HiveScript::ExportDictionary => "ExportDictionary.q",
            HiveScript::ExportForeignisms => "ExportForeignisms.q",
            HiveScript::ProcessNeologisms => "ProcessNeologisms.q",
            HiveScript::ExportNeologisms => "ExportNeologisms.q",
        }
    }

    pub fn contents(&self) -> &'static str {
        match self {
            HiveScript::ImportNgrams => include_str!("../hive/ImportNgrams.q"),
            HiveScript::CreateWindow => include_str!("../hive/CreateWindow.q"),
            HiveScript::ShiftWindow => include_str!("../hive/ShiftWindow.q"),
            HiveScript::ExportDictionary => include_str!("../hive/ExportDictionary.q"),
            HiveScript::ExportForeignisms => include_str!("../hive/ExportForeignisms.q"),
            HiveScript::ProcessNeologisms => include_str!("../hive/ProcessNeologisms.q"),
            HiveScript::ExportNeologisms => include_str!("../hive/ExportNeologisms.q"),
        }
    }

    /// Variables `${...}` que el script espera recibir con `-d`.
    pub fn parameters(&self) -> &'static [&'static str] {
        match self {
            HiveScript::ImportNgrams => &["ngramsLocation", "regex", "ngramsTable"],
            HiveScript::CreateWindow => &["ngramsTable", "fromYear", "toYear"],
            HiveScript::ShiftWindow => &["ngramsTable", "newYear", "windowSize"],
            HiveScript::ExportDictionary => {
                &["ngramsTable", "windowSize", "percentOfYears", "output"]
            }
            HiveScript::ExportForeignisms => &["ngramsTable1", "ngramsTable2", "output"],
            HiveScript::ProcessNeologisms => &["ngramsTable", "year"],
            HiveScript::ExportNeologisms => &["ngramsTable", "output"],
        }
    }
}
