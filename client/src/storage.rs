use async_trait::async_trait;
use ngrams_common::{Corpus, HiveScript, RunLayout};
use rusoto_core::Region;
use rusoto_s3::{
    CreateBucketConfiguration, CreateBucketRequest, ListObjectsV2Request, PutObjectRequest,
    S3Client, S3,
};
use tracing::{debug, info};

use crate::remote::RemoteError;

/// Lo mínimo que se necesita de un object store: crear el bucket de la
/// corrida, subir los scripts y listar idiomas del corpus.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn create_bucket(&self, bucket: &str) -> Result<(), RemoteError>;

    async fn put_object(&self, bucket: &str, key: &str, body: Vec<u8>) -> Result<(), RemoteError>;

    /// Prefijos comunes bajo `prefix`, agrupados por `delimiter`.
    async fn list_common_prefixes(
        &self,
        bucket: &str,
        prefix: &str,
        delimiter: &str,
    ) -> Result<Vec<String>, RemoteError>;
}

pub struct S3Store {
    client: S3Client,
    region: Region,
}

impl S3Store {
    pub fn new(client: S3Client, region: Region) -> Self {
        Self { client, region }
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn create_bucket(&self, bucket: &str) -> Result<(), RemoteError> {
        // us-east-1 no acepta LocationConstraint
        let create_bucket_configuration = match self.region {
            Region::UsEast1 => None,
            ref other => Some(CreateBucketConfiguration {
                location_constraint: Some(other.name().to_string()),
            }),
        };

        self.client
            .create_bucket(CreateBucketRequest {
                bucket: bucket.to_string(),
                create_bucket_configuration,
                ..Default::default()
            })
            .await
            .map_err(|e| RemoteError::from_rusoto("CreateBucket", e).logged())?;
        Ok(())
    }

    async fn put_object(&self, bucket: &str, key: &str, body: Vec<u8>) -> Result<(), RemoteError> {
        let content_length = i64::try_from(body.len()).ok();
        self.client
            .put_object(PutObjectRequest {
                bucket: bucket.to_string(),
                key: key.to_string(),
                content_length,
                body: Some(body.into()),
                ..Default::default()
            })
            .await
            .map_err(|e| RemoteError::from_rusoto("PutObject", e).logged())?;
        Ok(())
    }

    async fn list_common_prefixes(
        &self,
        bucket: &str,
        prefix: &str,
        delimiter: &str,
    ) -> Result<Vec<String>, RemoteError> {
        let mut prefixes = Vec::new();
        let mut continuation_token = None;

        loop {
            let page = self
                .client
                .list_objects_v2(ListObjectsV2Request {
                    bucket: bucket.to_string(),
                    prefix: Some(prefix.to_string()),
                    delimiter: Some(delimiter.to_string()),
                    continuation_token: continuation_token.take(),
                    ..Default::default()
                })
                .await
                .map_err(|e| RemoteError::from_rusoto("ListObjectsV2", e).logged())?;

            prefixes.extend(
                page.common_prefixes
                    .unwrap_or_default()
                    .into_iter()
                    .filter_map(|p| p.prefix),
            );

            match page.next_continuation_token {
                Some(token) if page.is_truncated == Some(true) => continuation_token = Some(token),
                _ => break,
            }
        }

        Ok(prefixes)
    }
}

/// Idiomas disponibles en el corpus, ej: ["eng-all", "spa-all", ...].
pub async fn list_languages<S: ObjectStore + ?Sized>(
    store: &S,
    corpus: &Corpus,
) -> Result<Vec<String>, RemoteError> {
    let prefixes = store
        .list_common_prefixes(&corpus.bucket, &corpus.prefix, "/")
        .await?;

    let languages: Vec<String> = prefixes
        .iter()
        .filter_map(|p| corpus.language_from_prefix(p))
        .map(str::to_string)
        .collect();

    debug!(count = languages.len(), "idiomas encontrados en {}", corpus.root_uri());
    Ok(languages)
}

/// Sube los scripts de Hive embebidos al bucket de la corrida.
pub async fn upload_hive_scripts<S: ObjectStore + ?Sized>(
    store: &S,
    layout: &RunLayout,
) -> Result<(), RemoteError> {
    for script in HiveScript::ALL {
        let key = layout.script_key(script);
        info!(
            "subiendo {} a s3://{}/{}",
            script.file_name(),
            layout.bucket,
            key
        );
        store
            .put_object(&layout.bucket, &key, script.contents().as_bytes().to_vec())
            .await?;
    }
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::fake::FakeStore;
    use super::*;

    #[tokio::test]
    async fn list_languages_limpia_prefijos() {
        let mut store = FakeStore::with_languages(&["eng-all", "spa-all"]);
        store.prefixes.push("basura/".to_string());

        let languages = list_languages(&store, &Corpus::default()).await.unwrap();
        assert_eq!(languages, vec!["eng-all", "spa-all"]);

        let listings = store.listings.lock().unwrap();
        assert_eq!(
            listings.as_slice(),
            &[(
                "datasets.elasticmapreduce".to_string(),
                "ngrams/books/20090715/".to_string(),
                "/".to_string()
            )]
        );
    }

    #[tokio::test]
    async fn upload_sube_los_siete_scripts() {
        let store = FakeStore::default();
        let layout = RunLayout::with_bucket("ana-test");

        upload_hive_scripts(&store, &layout).await.unwrap();

        let objects = store.objects.lock().unwrap();
        assert_eq!(objects.len(), 7);
        assert!(objects.iter().all(|(bucket, _, _)| bucket == "ana-test"));
        assert_eq!(objects[0].1, "EMR/HiveScripts/ImportNgrams.q");
        assert_eq!(objects[6].1, "EMR/HiveScripts/ExportNeologisms.q");
        assert_eq!(objects[2].2, HiveScript::ShiftWindow.contents().as_bytes());
    }

    /* ==== S3Store contra el dispatcher de rusoto_mock ==== */

    mod s3 {
        use crate::remote::RemoteError;
        use crate::storage::{list_languages, ObjectStore, S3Store};
        use ngrams_common::Corpus;
        use rusoto_core::Region;
        use rusoto_s3::S3Client;
        use rusoto_core::signature::{SignedRequest, SignedRequestPayload};
        use rusoto_mock::{
            MockCredentialsProvider, MockRequestDispatcher, MultipleMockRequestDispatcher,
        };
        use std::sync::{Arc, Mutex};

        fn page(prefixes: &[&str], next_token: Option<&str>) -> String {
            let common: String = prefixes
                .iter()
                .map(|p| format!("<CommonPrefixes><Prefix>{}</Prefix></CommonPrefixes>", p))
                .collect();
            let (truncated, token) = match next_token {
                Some(t) => ("true", format!("<NextContinuationToken>{}</NextContinuationToken>", t)),
                None => ("false", String::new()),
            };
            format!(
                r#"<?xml version="1.0" encoding="UTF-8"?>
<ListBucketResult xmlns="http://s3.amazonaws.com/doc/2006-03-01/"><Name>datasets.elasticmapreduce</Name><Prefix>ngrams/books/20090715/</Prefix><Delimiter>/</Delimiter><IsTruncated>{}</IsTruncated>{}{}</ListBucketResult>"#,
                truncated, token, common
            )
        }

        fn continuation_token(req: &SignedRequest) -> Option<String> {
            req.params.get("continuation-token").cloned().flatten()
        }

        fn payload_text(req: &SignedRequest) -> String {
            match &req.payload {
                Some(SignedRequestPayload::Buffer(bytes)) => String::from_utf8_lossy(bytes).into_owned(),
                _ => String::new(),
            }
        }

        #[tokio::test]
        async fn listado_sigue_el_token_de_continuacion() {
            let tokens = Arc::new(Mutex::new(Vec::new()));
            let (first, second) = (tokens.clone(), tokens.clone());

            let dispatcher = MultipleMockRequestDispatcher::new(vec![
                MockRequestDispatcher::with_status(200)
                    .with_body(&page(&["ngrams/books/20090715/eng-all/"], Some("tok-2")))
                    .with_request_checker(move |req: &SignedRequest| {
                        first.lock().unwrap().push(continuation_token(req));
                    }),
                MockRequestDispatcher::with_status(200)
                    .with_body(&page(
                        &["ngrams/books/20090715/fre-all/", "ngrams/books/20090715/spa-all/"],
                        None,
                    ))
                    .with_request_checker(move |req: &SignedRequest| {
                        second.lock().unwrap().push(continuation_token(req));
                    }),
            ]);
            let client = S3Client::new_with(dispatcher, MockCredentialsProvider, Region::UsEast1);
            let store = S3Store::new(client, Region::UsEast1);

            let languages = list_languages(&store, &Corpus::default()).await.unwrap();

            assert_eq!(languages, vec!["eng-all", "fre-all", "spa-all"]);
            assert_eq!(
                tokens.lock().unwrap().as_slice(),
                &[None, Some("tok-2".to_string())]
            );
        }

        #[tokio::test]
        async fn bucket_fuera_de_us_east_1_lleva_location_constraint() {
            let bodies = Arc::new(Mutex::new(Vec::new()));
            let seen = bodies.clone();
            let dispatcher = MockRequestDispatcher::with_status(200).with_request_checker(
                move |req: &SignedRequest| seen.lock().unwrap().push(payload_text(req)),
            );
            let client = S3Client::new_with(dispatcher, MockCredentialsProvider, Region::EuWest1);

            S3Store::new(client, Region::EuWest1)
                .create_bucket("ana-test")
                .await
                .unwrap();

            let bodies = bodies.lock().unwrap();
            assert_eq!(bodies.len(), 1);
            assert!(bodies[0].contains("<LocationConstraint>eu-west-1</LocationConstraint>"));
        }

        #[tokio::test]
        async fn bucket_en_us_east_1_sin_location_constraint() {
            let bodies = Arc::new(Mutex::new(Vec::new()));
            let seen = bodies.clone();
            let dispatcher = MockRequestDispatcher::with_status(200).with_request_checker(
                move |req: &SignedRequest| seen.lock().unwrap().push(payload_text(req)),
            );
            let client = S3Client::new_with(dispatcher, MockCredentialsProvider, Region::UsEast1);

            S3Store::new(client, Region::UsEast1)
                .create_bucket("ana-test")
                .await
                .unwrap();

            let bodies = bodies.lock().unwrap();
            assert_eq!(bodies.len(), 1);
            assert!(!bodies[0].contains("LocationConstraint"));
        }

        #[tokio::test]
        async fn rechazo_del_servicio_queda_tipado() {
            let dispatcher = MockRequestDispatcher::with_status(403).with_body("AccessDenied");
            let client = S3Client::new_with(dispatcher, MockCredentialsProvider, Region::UsEast1);

            let err = S3Store::new(client, Region::UsEast1)
                .put_object("ana-test", "EMR/HiveScripts/ImportNgrams.q", b"--".to_vec())
                .await
                .unwrap_err();

            assert_eq!(err.operation(), "PutObject");
            assert!(matches!(err, RemoteError::Service { status: Some(403), .. }));
        }
    }

    #[tokio::test]
    async fn upload_corta_en_el_primer_error() {
        let store = FakeStore {
            fail_put: true,
            ..Default::default()
        };
        let err = upload_hive_scripts(&store, &RunLayout::with_bucket("b"))
            .await
            .unwrap_err();
        assert_eq!(err.operation(), "PutObject");
        assert!(store.object_keys().is_empty());
    }
}
