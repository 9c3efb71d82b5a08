use serde::{Deserialize, Serialize};

pub const DEFAULT_EMR_REGION: &str = "us-east-1";

/// Qué hace EMR cuando un step falla; siempre se termina el cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionOnFailure {
    TerminateCluster,
}

impl ActionOnFailure {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionOnFailure::TerminateCluster => "TERMINATE_CLUSTER",
        }
    }
}

/// Parámetro `-d key=value` de un script de Hive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptParam {
    pub key: String,
    pub value: String,
}

impl ScriptParam {
    pub fn new(key: impl Into<String>, value: impl ToString) -> Self {
        Self {
            key: key.into(),
            value: value.to_string(),
        }
    }
}

/// Un step del job: corre un script de Hive guardado en S3.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    /// "Step-001", "Step-002", ... (EMR los muestra ordenados por nombre)
    pub name: String,

    /// URI del script en S3, ej: "s3://bucket/EMR/HiveScripts/ImportNgrams.q"
    pub script: String,

    pub params: Vec<ScriptParam>,

    pub action_on_failure: ActionOnFailure,
}

impl Step {
    /// Step de Hive que termina el cluster si falla.
    pub fn hive(name: impl Into<String>, script: impl Into<String>, params: Vec<ScriptParam>) -> Self {
        Self {
            name: name.into(),
            script: script.into(),
            params,
            action_on_failure: ActionOnFailure::TerminateCluster,
        }
    }

    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|p| p.key == key)
            .map(|p| p.value.as_str())
    }

    /// Argumentos para el script: cada parámetro lleva "-d" adelante.
    pub fn script_args(&self) -> Vec<String> {
        self.params
            .iter()
            .flat_map(|p| ["-d".to_string(), format!("{}={}", p.key, p.value)])
            .collect()
    }

    /// Traduce el step al formato de script-runner que usa EMR para Hive.
    pub fn jar_step(&self, region: &str) -> JarStep {
        JarStep::hive_script(region, &self.script, self.script_args())
    }
}

/// Jar + argumentos que EMR ejecuta para un step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JarStep {
    pub jar: String,
    pub args: Vec<String>,
}

impl JarStep {
    /// Equivalente a `hive-script --run-hive-script --args -f <script> ...`
    /// usando las librerías que EMR publica en `<region>.elasticmapreduce`.
    pub fn hive_script(region: &str, script: &str, script_args: Vec<String>) -> Self {
        let libs = format!("s3://{}.elasticmapreduce/libs", region);

        let mut args = vec![
            format!("{}/hive/hive-script", libs),
            "--base-path".to_string(),
            format!("{}/hive/", libs),
            "--hive-versions".to_string(),
            "latest".to_string(),
            "--run-hive-script".to_string(),
            "--args".to_string(),
            "-f".to_string(),
            script.to_string(),
        ];
        args.extend(script_args);

        Self {
            jar: format!("{}/script-runner/script-runner.jar", libs),
            args,
        }
    }
}
