//! Modelo del job de EMR que busca neologismos y extranjerismos en el corpus
//! de n-gramas de Google Books: parámetros de la corrida, steps de Hive,
//! rutas en S3 y los scripts que se suben.

pub mod instances;
pub mod job;
pub mod layout;
pub mod params;
pub mod plan;
pub mod scripts;
pub mod step;

pub use instances::instance_type_options;
pub use job::{Configuration, InstanceTopology, JobId, JobRequest};
pub use layout::{table_name, Corpus, RunLayout};
pub use params::{validate_cluster_size, RunParameters, ValidationError, YearWindow};
pub use plan::{plan_steps, PlanError, StepSequenceBuilder, MAX_STEPS};
pub use scripts::HiveScript;
pub use step::{ActionOnFailure, JarStep, ScriptParam, Step};
