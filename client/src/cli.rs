use anyhow::Result;
use clap::Parser;
use ngrams_common::RunLayout;
use rusoto_core::region::ParseRegionError;
use rusoto_core::request::TlsError;
use rusoto_core::{HttpClient, Region};
use rusoto_credential::{CredentialsError, ProfileProvider};
use rusoto_emr::EmrClient;
use rusoto_s3::S3Client;
use std::str::FromStr;
use thiserror::Error;
use tracing::info;

use crate::cluster::EmrService;
use crate::console::StdConsole;
use crate::finder::{Ec2Key, Finder, FinderOptions};
use crate::storage::S3Store;

#[derive(Parser, Debug)]
#[command(name = "ngrams-finder")]
#[command(about = "Lanza en EMR la búsqueda de neologismos y extranjerismos sobre Google Books Ngrams")]
pub struct Cli {
    /// Región de AWS donde se crea el bucket y corre el cluster
    #[arg(long, env = "NGRAMS_REGION", default_value = "us-east-1")]
    pub region: String,

    /// Perfil del archivo de credenciales de AWS
    #[arg(long, env = "AWS_PROFILE", default_value = "default")]
    pub profile: String,

    /// Bucket de trabajo; si no se indica se genera "ana-<uuid>"
    #[arg(long, env = "NGRAMS_BUCKET")]
    pub bucket: Option<String>,

    /// Key de EC2 para entrar al master; sin valor se pregunta por consola
    #[arg(long = "ec2-key", value_name = "NAME", num_args = 0..=1, default_missing_value = "")]
    pub ec2_key: Option<String>,

    /// Muestra el request completo antes de enviarlo
    #[arg(long)]
    pub print_request: bool,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid AWS region: {0}")]
    InvalidRegion(#[from] ParseRegionError),

    #[error("could not load AWS credentials: {0}")]
    Credentials(#[from] CredentialsError),

    #[error("could not initialise the HTTP client: {0}")]
    Tls(#[from] TlsError),
}

impl Cli {
    pub fn region(&self) -> Result<Region, ConfigError> {
        Ok(Region::from_str(&self.region)?)
    }

    pub fn layout(&self) -> RunLayout {
        match &self.bucket {
            Some(bucket) => RunLayout::with_bucket(bucket.clone()),
            None => RunLayout::generate(),
        }
    }

    pub fn finder_options(&self) -> FinderOptions {
        let ec2_key = match self.ec2_key.as_deref() {
            None => Ec2Key::None,
            Some("") => Ec2Key::Prompt,
            Some(name) => Ec2Key::Named(name.to_string()),
        };
        FinderOptions {
            ec2_key,
            print_request: self.print_request,
        }
    }

    fn credentials(&self) -> Result<ProfileProvider, ConfigError> {
        let mut provider = ProfileProvider::new()?;
        provider.set_profile(self.profile.clone());
        Ok(provider)
    }
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    let region = cli.region()?;
    let credentials = cli.credentials()?;
    let layout = cli.layout();
    info!(
        region = region.name(),
        profile = %cli.profile,
        bucket = %layout.bucket,
        "configuración cargada"
    );

    let s3 = S3Client::new_with(
        HttpClient::new().map_err(ConfigError::from)?,
        credentials.clone(),
        region.clone(),
    );
    let emr = EmrClient::new_with(
        HttpClient::new().map_err(ConfigError::from)?,
        credentials,
        region.clone(),
    );

    let mut finder = Finder::new(
        S3Store::new(s3, region.clone()),
        EmrService::new(emr, region.name()),
        StdConsole::stdio(),
        layout,
        cli.finder_options(),
    );
    finder.run().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("ngrams-finder").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn valores_por_defecto() {
        let cli = parse(&["--region", "us-east-1", "--profile", "default"]);
        assert_eq!(cli.region().unwrap(), Region::UsEast1);
        assert!(cli.layout().bucket.starts_with("ana-"));

        let options = cli.finder_options();
        assert_eq!(options.ec2_key, Ec2Key::None);
        assert!(!options.print_request);
    }

    #[test]
    fn ec2_key_con_y_sin_valor() {
        let cli = parse(&["--ec2-key", "deploy"]);
        assert_eq!(cli.finder_options().ec2_key, Ec2Key::Named("deploy".to_string()));

        let cli = parse(&["--ec2-key", "--print-request"]);
        let options = cli.finder_options();
        assert_eq!(options.ec2_key, Ec2Key::Prompt);
        assert!(options.print_request);
    }

    #[test]
    fn bucket_explicito_y_region_invalida() {
        let cli = parse(&["--bucket", "mi-bucket", "--region", "marte-1"]);
        assert_eq!(cli.layout().bucket, "mi-bucket");
        assert!(matches!(cli.region(), Err(ConfigError::InvalidRegion(_))));

        let cli = parse(&["--region", "eu-west-1"]);
        assert_eq!(cli.region().unwrap(), Region::EuWest1);
    }
}
