use async_trait::async_trait;
use ngrams_common::{JobId, JobRequest};
use rusoto_emr::{
    Application, Configuration, Emr, EmrClient, HadoopJarStepConfig, JobFlowInstancesConfig,
    RunJobFlowInput, StepConfig,
};
use std::collections::HashMap;
use tracing::info;

use crate::remote::RemoteError;

/// Servicio que recibe el job completo y devuelve su id.
#[async_trait]
pub trait ClusterService: Send + Sync {
    async fn submit(&self, request: &JobRequest) -> Result<JobId, RemoteError>;
}

pub struct EmrService {
    client: EmrClient,
    /// Región de las librerías de EMR (script-runner, hive-script)
    region: String,
}

impl EmrService {
    pub fn new(client: EmrClient, region: impl Into<String>) -> Self {
        Self {
            client,
            region: region.into(),
        }
    }
}

#[async_trait]
impl ClusterService for EmrService {
    async fn submit(&self, request: &JobRequest) -> Result<JobId, RemoteError> {
        let input = run_job_flow_input(request, &self.region);
        info!(
            name = %input.name,
            steps = request.steps.len(),
            instances = request.instances.instance_count,
            "enviando RunJobFlow"
        );

        let output = self
            .client
            .run_job_flow(input)
            .await
            .map_err(|e| RemoteError::from_rusoto("RunJobFlow", e).logged())?;

        output.job_flow_id.ok_or_else(|| {
            RemoteError::MissingField {
                operation: "RunJobFlow",
                field: "JobFlowId",
            }
            .logged()
        })
    }
}

/// Traduce el request del dominio al input de `RunJobFlow`.
pub fn run_job_flow_input(request: &JobRequest, region: &str) -> RunJobFlowInput {
    let applications = request
        .applications
        .iter()
        .map(|name| Application {
            name: Some(name.clone()),
            ..Default::default()
        })
        .collect();

    let configurations = request
        .configurations
        .iter()
        .map(|c| Configuration {
            classification: Some(c.classification.clone()),
            properties: Some(
                c.properties
                    .iter()
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect::<HashMap<_, _>>(),
            ),
            ..Default::default()
        })
        .collect();

    let steps = request
        .steps
        .iter()
        .map(|step| {
            let jar = step.jar_step(region);
            StepConfig {
                name: step.name.clone(),
                action_on_failure: Some(step.action_on_failure.as_str().to_string()),
                hadoop_jar_step: HadoopJarStepConfig {
                    jar: jar.jar,
                    args: Some(jar.args),
                    ..Default::default()
                },
            }
        })
        .collect();

    let topo = &request.instances;
    let instances = JobFlowInstancesConfig {
        instance_count: Some(i64::from(topo.instance_count)),
        master_instance_type: Some(topo.master_instance_type.clone()),
        slave_instance_type: Some(topo.slave_instance_type.clone()),
        ec_2_key_name: topo.ec2_key_name.clone(),
        keep_job_flow_alive_when_no_steps: Some(topo.keep_alive_when_no_steps),
        ..Default::default()
    };

    RunJobFlowInput {
        name: request.name.clone(),
        release_label: Some(request.release_label.clone()),
        applications: Some(applications),
        configurations: Some(configurations),
        steps: Some(steps),
        instances,
        log_uri: Some(request.log_uri.clone()),
        service_role: Some(request.service_role.clone()),
        job_flow_role: Some(request.job_flow_role.clone()),
        ..Default::default()
    }
}
