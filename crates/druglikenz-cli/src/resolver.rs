use crate::config::models::ResolverSettings;
use crate::error::{CliError, Result};
use druglikenz::engine::resolver::{NameResolver, ResolverError};
use reqwest::StatusCode;
use serde::Deserialize;
use tokio::runtime::Handle;
use tracing::{debug, trace};

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
struct SynonymResponse {
    information_list: InformationList,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
struct InformationList {
    #[serde(default)]
    information: Vec<Information>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
struct Information {
    #[serde(default)]
    synonym: Vec<String>,
}

/// Extracts the first synonym from a PUG-REST synonyms response body.
pub fn first_synonym(body: &str) -> std::result::Result<Option<String>, ResolverError> {
    let response: SynonymResponse =
        serde_json::from_str(body).map_err(|e| ResolverError::InvalidResponse(e.to_string()))?;
    Ok(response
        .information_list
        .information
        .into_iter()
        .flat_map(|info| info.synonym)
        .next())
}

fn classify(error: reqwest::Error) -> ResolverError {
    if error.is_timeout() {
        ResolverError::Timeout
    } else {
        ResolverError::Request(error.to_string())
    }
}

/// Looks up compound names through the PubChem PUG-REST synonyms endpoint.
///
/// Lookups block the calling thread on the ambient tokio runtime, so they must run
/// inside [`tokio::task::block_in_place`] or on a thread outside the runtime.
pub struct PubChemResolver {
    client: reqwest::Client,
    endpoint: String,
    runtime: Handle,
}

impl PubChemResolver {
    pub fn new(settings: &ResolverSettings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(settings.timeout)
            .user_agent(concat!("druglikenz/", env!("CARGO_PKG_VERSION")))
            .build()?;
        let runtime = Handle::try_current().map_err(|e| {
            CliError::Other(anyhow::anyhow!("Name resolver requires a tokio runtime: {e}"))
        })?;
        Ok(Self {
            client,
            endpoint: Self::endpoint_for(&settings.base_url),
            runtime,
        })
    }

    fn endpoint_for(base_url: &str) -> String {
        format!(
            "{}/compound/smiles/synonyms/JSON",
            base_url.trim_end_matches('/')
        )
    }

    async fn fetch(&self, smiles: &str) -> std::result::Result<Option<String>, ResolverError> {
        trace!(endpoint = %self.endpoint, smiles, "Requesting synonyms.");
        let response = self
            .client
            .post(&self.endpoint)
            .form(&[("smiles", smiles)])
            .send()
            .await
            .map_err(classify)?;

        if response.status() == StatusCode::NOT_FOUND {
            debug!(smiles, "No PubChem compound matches this structure.");
            return Ok(None);
        }

        let body = response
            .error_for_status()
            .map_err(classify)?
            .text()
            .await
            .map_err(classify)?;
        first_synonym(&body)
    }
}

impl NameResolver for PubChemResolver {
    fn lookup(&self, structure: &str) -> std::result::Result<Option<String>, ResolverError> {
        self.runtime.block_on(self.fetch(structure))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn first_synonym_takes_the_first_entry() {
        let body = r#"{
            "InformationList": {
                "Information": [
                    { "CID": 2244, "Synonym": ["aspirin", "ACETYLSALICYLIC ACID", "50-78-2"] }
                ]
            }
        }"#;
        assert_eq!(first_synonym(body), Ok(Some("aspirin".to_string())));
    }

    #[test]
    fn first_synonym_skips_entries_without_synonyms() {
        let body = r#"{
            "InformationList": {
                "Information": [ { "CID": 1 }, { "CID": 2, "Synonym": ["ethanol"] } ]
            }
        }"#;
        assert_eq!(first_synonym(body), Ok(Some("ethanol".to_string())));

        let empty = r#"{ "InformationList": { "Information": [ { "CID": 1 } ] } }"#;
        assert_eq!(first_synonym(empty), Ok(None));
    }

    #[test]
    fn unreadable_bodies_are_invalid_responses() {
        assert!(matches!(
            first_synonym("<html>busy</html>"),
            Err(ResolverError::InvalidResponse(_))
        ));
        assert!(matches!(
            first_synonym(r#"{ "Fault": { "Code": "PUGREST.NotFound" } }"#),
            Err(ResolverError::InvalidResponse(_))
        ));
    }

    #[test]
    fn endpoint_ignores_trailing_slash() {
        assert_eq!(
            PubChemResolver::endpoint_for("https://pubchem.ncbi.nlm.nih.gov/rest/pug/"),
            "https://pubchem.ncbi.nlm.nih.gov/rest/pug/compound/smiles/synonyms/JSON"
        );
    }

    #[test]
    fn construction_outside_a_runtime_fails() {
        let settings = ResolverSettings {
            enabled: true,
            base_url: "http://127.0.0.1:1".to_string(),
            timeout: Duration::from_secs(1),
        };
        assert!(matches!(
            PubChemResolver::new(&settings),
            Err(CliError::Other(_))
        ));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn unreachable_host_is_a_request_error() {
        let settings = ResolverSettings {
            enabled: true,
            base_url: "http://127.0.0.1:1".to_string(),
            timeout: Duration::from_secs(2),
        };
        let resolver = PubChemResolver::new(&settings).unwrap();
        let result = tokio::task::block_in_place(|| resolver.lookup("CCO"));
        assert!(matches!(
            result,
            Err(ResolverError::Request(_)) | Err(ResolverError::Timeout)
        ));
    }
}
