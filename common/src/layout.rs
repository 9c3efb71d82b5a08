use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::scripts::HiveScript;

/// Bucket público donde EMR publica el corpus de Google Books.
pub const CORPUS_BUCKET: &str = "datasets.elasticmapreduce";
pub const CORPUS_PREFIX: &str = "ngrams/books/20090715/";

pub const SCRIPTS_PREFIX: &str = "EMR/HiveScripts/";
pub const OUTPUT_PREFIX: &str = "EMR/Output/";
pub const LOGS_PREFIX: &str = "EMR/Logs/";

/// Ubicación del corpus de n-gramas, particionado por idioma y tamaño de n-grama.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Corpus {
    pub bucket: String,
    pub prefix: String,
}

impl Default for Corpus {
    fn default() -> Self {
        Self {
            bucket: CORPUS_BUCKET.to_string(),
            prefix: CORPUS_PREFIX.to_string(),
        }
    }
}

impl Corpus {
    /// ej: "s3://datasets.elasticmapreduce/ngrams/books/20090715/"
    pub fn root_uri(&self) -> String {
        format!("s3://{}/{}", self.bucket, self.prefix)
    }

    /// Carpeta de 1-gramas de un idioma, ej: ".../eng-all/1gram/"
    pub fn location(&self, language: &str) -> String {
        format!("{}{}/1gram/", self.root_uri(), language)
    }

    /// Saca el prefijo del corpus y la barra final: "ngrams/.../eng-all/" -> "eng-all".
    pub fn language_from_prefix<'a>(&self, common_prefix: &'a str) -> Option<&'a str> {
        let name = common_prefix
            .strip_prefix(self.prefix.as_str())?
            .strip_suffix('/')?;
        if name.is_empty() {
            None
        } else {
            Some(name)
        }
    }
}

/// Nombre de tabla de Hive para un idioma (Hive no acepta '-').
pub fn table_name(language: &str) -> String {
    language.replace('-', "_")
}

/// Rutas de una corrida, todas dentro de un bucket propio.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunLayout {
    pub bucket: String,
}

impl RunLayout {
    /// Bucket nuevo con nombre único: "ana-<uuid>".
    pub fn generate() -> Self {
        Self::with_bucket(format!("ana-{}", Uuid::new_v4()))
    }

    pub fn with_bucket(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
        }
    }

    pub fn scripts_uri(&self) -> String {
        format!("s3://{}/{}", self.bucket, SCRIPTS_PREFIX)
    }

    /// Key (relativa al bucket) donde se sube un script.
    pub fn script_key(&self, script: HiveScript) -> String {
        format!("{}{}", SCRIPTS_PREFIX, script.file_name())
    }

    pub fn script_uri(&self, script: HiveScript) -> String {
        format!("{}{}", self.scripts_uri(), script.file_name())
    }

    pub fn output_uri(&self) -> String {
        format!("s3://{}/{}", self.bucket, OUTPUT_PREFIX)
    }

    pub fn logs_uri(&self) -> String {
        format!("s3://{}/{}", self.bucket, LOGS_PREFIX)
    }

    pub fn dictionary_output(&self, table: &str) -> String {
        format!("{}{}/Dic", self.output_uri(), table)
    }

    pub fn foreignisms_output(&self, table1: &str, table2: &str) -> String {
        format!("{}{}/Foreignisms/{}", self.output_uri(), table1, table2)
    }

    pub fn neologisms_output(&self, table: &str) -> String {
        format!("{}{}/Neo", self.output_uri(), table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corpus_por_defecto() {
        let corpus = Corpus::default();
        assert_eq!(
            corpus.root_uri(),
            "s3://datasets.elasticmapreduce/ngrams/books/20090715/"
        );
        assert_eq!(
            corpus.location("spa-all"),
            "s3://datasets.elasticmapreduce/ngrams/books/20090715/spa-all/1gram/"
        );
    }

    #[test]
    fn language_from_prefix_limpia_ruta() {
        let corpus = Corpus::default();
        assert_eq!(
            corpus.language_from_prefix("ngrams/books/20090715/eng-all/"),
            Some("eng-all")
        );
        assert_eq!(corpus.language_from_prefix("ngrams/books/20090715/"), None);
        assert_eq!(corpus.language_from_prefix("otra/cosa/eng-all/"), None);
        assert_eq!(corpus.language_from_prefix("ngrams/books/20090715/x"), None);
    }

    #[test]
    fn table_name_reemplaza_guiones() {
        assert_eq!(table_name("eng-us-all"), "eng_us_all");
        assert_eq!(table_name("fre"), "fre");
    }

    #[test]
    fn generate_crea_bucket_unico() {
        let a = RunLayout::generate();
        let b = RunLayout::generate();
        assert!(a.bucket.starts_with("ana-"));
        assert_eq!(a.bucket.len(), "ana-".len() + 36);
        assert_ne!(a.bucket, b.bucket);
    }

    #[test]
    fn rutas_de_la_corrida() {
        let layout = RunLayout::with_bucket("ana-test");
        assert_eq!(layout.scripts_uri(), "s3://ana-test/EMR/HiveScripts/");
        assert_eq!(layout.script_key(HiveScript::ShiftWindow), "EMR/HiveScripts/ShiftWindow.q");
        assert_eq!(
            layout.script_uri(HiveScript::ImportNgrams),
            "s3://ana-test/EMR/HiveScripts/ImportNgrams.q"
        );
        assert_eq!(layout.logs_uri(), "s3://ana-test/EMR/Logs/");
        assert_eq!(layout.dictionary_output("eng_all"), "s3://ana-test/EMR/Output/eng_all/Dic");
        assert_eq!(
            layout.foreignisms_output("spa_all", "eng_all"),
            "s3://ana-test/EMR/Output/spa_all/Foreignisms/eng_all"
        );
        assert_eq!(layout.neologisms_output("spa_all"), "s3://ana-test/EMR/Output/spa_all/Neo");
    }
}
