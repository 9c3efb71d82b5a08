use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::step::Step;

pub type JobId = String;

/// Nombre y release de EMR con el que se lanza el cluster.
pub const JOB_NAME: &str = "EMR-4.2.0";
pub const RELEASE_LABEL: &str = "emr-4.2.0";

pub const SERVICE_ROLE: &str = "EMR_DefaultRole";
pub const JOB_FLOW_ROLE: &str = "EMR_EC2_DefaultRole";

/// Aplicaciones que se instalan en el cluster.
pub const APPLICATIONS: [&str; 2] = ["hive", "hadoop"];

pub const HIVE_INPUT_FORMAT: &str = "org.apache.hadoop.hive.ql.io.HiveInputFormat";
// 128Mb = 134217728B
pub const MIN_SPLIT_SIZE: u64 = 134_217_728;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRequest {
    pub name: String,
    pub release_label: String,

    /// Aplicaciones por nombre, ej: "hive", "hadoop"
    pub applications: Vec<String>,

    /// Overrides de configuración (hive-site, mapred-site, ...)
    pub configurations: Vec<Configuration>,

    /// Steps en el orden exacto en que se ejecutan
    pub steps: Vec<Step>,

    pub instances: InstanceTopology,

    /// Ruta en S3 donde EMR deja los logs
    pub log_uri: String,

    pub service_role: String,
    pub job_flow_role: String,
}

impl JobRequest {
    /// Arma el request con los valores fijos (nombre, release, roles,
    /// aplicaciones y configuración de Hive).
    pub fn new(steps: Vec<Step>, instances: InstanceTopology, log_uri: impl Into<String>) -> Self {
        Self {
            name: JOB_NAME.to_string(),
            release_label: RELEASE_LABEL.to_string(),
            applications: default_applications(),
            configurations: default_configurations(),
            steps,
            instances,
            log_uri: log_uri.into(),
            service_role: SERVICE_ROLE.to_string(),
            job_flow_role: JOB_FLOW_ROLE.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    pub classification: String,
    pub properties: BTreeMap<String, String>,
}

/// Topología del cluster: 1 master y `instance_count - 1` slaves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceTopology {
    pub instance_count: u32,
    pub master_instance_type: String,
    pub slave_instance_type: String,
    pub ec2_key_name: Option<String>,

    /// Si es false el cluster termina cuando se queda sin steps
    pub keep_alive_when_no_steps: bool,
}

impl InstanceTopology {
    pub fn new(
        instance_count: u32,
        master_instance_type: impl Into<String>,
        slave_instance_type: impl Into<String>,
    ) -> Self {
        Self {
            instance_count,
            master_instance_type: master_instance_type.into(),
            slave_instance_type: slave_instance_type.into(),
            ec2_key_name: None,
            keep_alive_when_no_steps: false,
        }
    }

    pub fn with_ec2_key(mut self, key: Option<String>) -> Self {
        self.ec2_key_name = key;
        self
    }

    pub fn slave_count(&self) -> u32 {
        self.instance_count.saturating_sub(1)
    }
}

pub fn default_applications() -> Vec<String> {
    APPLICATIONS.iter().map(|a| a.to_string()).collect()
}

/// Configuración necesaria para que Hive parta y procese bien los archivos
/// del corpus.
pub fn default_configurations() -> Vec<Configuration> {
    let mut hive_properties = BTreeMap::new();
    hive_properties.insert("hive.input.format".to_string(), HIVE_INPUT_FORMAT.to_string());
    hive_properties.insert("mapred.min.split.size".to_string(), MIN_SPLIT_SIZE.to_string());

    vec![Configuration {
        classification: "hive-site".to_string(),
        properties: hive_properties,
    }]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_usa_valores_fijos() {
        let topo = InstanceTopology::new(5, "m4.large", "m3.xlarge");
        let req = JobRequest::new(Vec::new(), topo.clone(), "s3://b/EMR/Logs/");

        assert_eq!(req.name, "EMR-4.2.0");
        assert_eq!(req.release_label, "emr-4.2.0");
        assert_eq!(req.applications, vec!["hive", "hadoop"]);
        assert_eq!(req.service_role, "EMR_DefaultRole");
        assert_eq!(req.job_flow_role, "EMR_EC2_DefaultRole");
        assert_eq!(req.log_uri, "s3://b/EMR/Logs/");
        assert_eq!(req.instances, topo);
    }

    #[test]
    fn configuracion_hive_site() {
        let configs = default_configurations();
        assert_eq!(configs.len(), 1);

        let hive = &configs[0];
        assert_eq!(hive.classification, "hive-site");
        assert_eq!(
            hive.properties.get("hive.input.format").map(String::as_str),
            Some("org.apache.hadoop.hive.ql.io.HiveInputFormat")
        );
        assert_eq!(
            hive.properties.get("mapred.min.split.size").map(String::as_str),
            Some("134217728")
        );
    }

    #[test]
    fn topologia_cuenta_slaves() {
        let topo = InstanceTopology::new(10, "c3.xlarge", "m1.xlarge");
        assert_eq!(topo.slave_count(), 9);
        assert!(!topo.keep_alive_when_no_steps);
        assert_eq!(topo.ec2_key_name, None);

        let single = InstanceTopology::new(1, "m1.large", "m1.large")
            .with_ec2_key(Some("my-key".to_string()));
        assert_eq!(single.slave_count(), 0);
        assert_eq!(single.ec2_key_name.as_deref(), Some("my-key"));
    }

    #[test]
    fn request_se_serializa_a_json() {
        let req = JobRequest::new(
            Vec::new(),
            InstanceTopology::new(3, "m1.large", "m1.large"),
            "s3://b/EMR/Logs/",
        );
        let json = serde_json::to_value(&req).unwrap();

        assert_eq!(json["name"], "EMR-4.2.0");
        assert_eq!(json["instances"]["instance_count"], 3);
        assert_eq!(
            json["configurations"][0]["properties"]["mapred.min.split.size"],
            "134217728"
        );
    }
}
