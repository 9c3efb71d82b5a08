use anyhow::{Context, Result};
use ngrams_common::{
    instance_type_options, plan_steps, validate_cluster_size, Corpus, InstanceTopology, JobId,
    JobRequest, RunLayout, RunParameters,
};
use std::io::{BufRead, Write};
use tracing::info;

use crate::cluster::ClusterService;
use crate::console::Console;
use crate::storage::{list_languages, upload_hive_scripts, ObjectStore};

/// Cómo se obtiene la key de EC2 del cluster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ec2Key {
    None,
    Named(String),
    Prompt,
}

#[derive(Debug, Clone)]
pub struct FinderOptions {
    pub ec2_key: Ec2Key,
    pub print_request: bool,
}

impl Default for FinderOptions {
    fn default() -> Self {
        Self {
            ec2_key: Ec2Key::None,
            print_request: false,
        }
    }
}

/// Una corrida completa: pregunta los parámetros, prepara el bucket y lanza
/// el cluster que busca neologismos y extranjerismos.
pub struct Finder<S, C, R, W> {
    store: S,
    cluster: C,
    console: Console<R, W>,
    corpus: Corpus,
    layout: RunLayout,
    options: FinderOptions,
}

impl<S, C, R, W> Finder<S, C, R, W>
where
    S: ObjectStore,
    C: ClusterService,
    R: BufRead,
    W: Write,
{
    pub fn new(
        store: S,
        cluster: C,
        console: Console<R, W>,
        layout: RunLayout,
        options: FinderOptions,
    ) -> Self {
        Self {
            store,
            cluster,
            console,
            corpus: Corpus::default(),
            layout,
            options,
        }
    }

    pub async fn run(&mut self) -> Result<JobId> {
        // 1) Bucket de la corrida (scripts, salida y logs)
        info!(bucket = %self.layout.bucket, "creando bucket");
        self.store
            .create_bucket(&self.layout.bucket)
            .await
            .with_context(|| format!("could not create bucket {}", self.layout.bucket))?;

        // 2) Parámetros
        let params = self.ask_parameters().await?;
        let window = params.validate()?;

        self.console.newline()?;
        self.console
            .println("Insert the size of the cluster, between 1 and 20 (e.g., 10):")?;
        let cluster_size = validate_cluster_size(self.console.read_integer()?)?;

        let ec2_key = self.ec2_key()?;

        // 3) Steps; se arman antes de subir nada
        let steps = plan_steps(&self.layout, &self.corpus, &params, &window)?;
        info!(
            steps = steps.len(),
            language1 = %params.language1,
            language2 = %params.language2,
            "plan de steps armado"
        );

        upload_hive_scripts(&self.store, &self.layout)
            .await
            .context("could not upload the Hive scripts")?;

        // 4) Request y envío
        let instances = InstanceTopology::new(
            cluster_size,
            params.master_instance_type.clone(),
            params.slave_instance_type.clone(),
        )
        .with_ec2_key(ec2_key);
        let request = JobRequest::new(steps, instances, self.layout.logs_uri());

        if self.options.print_request {
            info!("request:\n{}", serde_json::to_string_pretty(&request)?);
        }

        let job_id = self
            .cluster
            .submit(&request)
            .await
            .context("could not launch the cluster")?;
        info!(job_id = %job_id, "job lanzado");

        self.console.newline()?;
        self.console.println("Launching job with id:")?;
        self.console.println(&job_id)?;
        self.console.newline()?;

        Ok(job_id)
    }

    async fn ask_parameters(&mut self) -> Result<RunParameters> {
        self.console.println("Loading options...")?;
        let languages = list_languages(&self.store, &self.corpus)
            .await
            .context("could not list the available languages")?;

        self.console.newline()?;
        self.console.println("Select the main language to analyze:")?;
        let language1 = self
            .console
            .select_option("Language options:", &languages, 1)?
            .to_string();

        self.console.newline()?;
        self.console.println(
            "Select the language from which to extract the foreignisms, or the same as before if \
             you are only interested in neologisms:",
        )?;
        let language2 = self
            .console
            .select_option("Language options:", &languages, 1)?
            .to_string();

        let instance_types = instance_type_options();

        self.console.newline()?;
        self.console.println("Select master instance type:")?;
        let master_instance_type = self
            .console
            .select_option("Instance type options:", &instance_types, 3)?
            .to_string();

        self.console.newline()?;
        self.console.println("Select slave instance type:")?;
        let slave_instance_type = self
            .console
            .select_option("Instance type options:", &instance_types, 3)?
            .to_string();

        self.console.newline()?;
        self.console.println(
            "Insert the year from which to start the analysis, between 1700 and 2008 (e.g., 1800):",
        )?;
        let from_year = self.console.read_integer()?;

        self.console.newline()?;
        self.console.println(
            "Insert the year to end the analysis, between the previous selected number and 2008 \
             (e.g., 1820):",
        )?;
        let to_year = self.console.read_integer()?;

        self.console.newline()?;
        self.console.println(
            "Insert the size of the window, which must be smaller than the difference of the \
             years (e.g., 5):",
        )?;
        let window_size = self.console.read_integer()?;

        self.console.newline()?;
        self.console.println(
            "Insert the percent of years needed for a gram, between 0.1 and 1.0 (e.g., 0.8):",
        )?;
        let percent_of_years = self.console.read_decimal()?;

        Ok(RunParameters {
            language1,
            language2,
            master_instance_type,
            slave_instance_type,
            from_year,
            to_year,
            window_size,
            percent_of_years,
        })
    }

    fn ec2_key(&mut self) -> Result<Option<String>> {
        match &self.options.ec2_key {
            Ec2Key::None => Ok(None),
            Ec2Key::Named(name) => Ok(Some(name.clone())),
            Ec2Key::Prompt => {
                self.console.newline()?;
                self.console.println("Insert the name of the ec2-key (e.g., my-key):")?;
                Ok(Some(self.console.read_word()?))
            }
        }
    }
}
