use druglikenz::core::rules::RuleId;
use druglikenz::engine::config::DEFAULT_CHUNK_SIZE;

pub struct DefaultsConfig {
    pub structure_column: String,
    pub rule: RuleId,
    pub chunk_size: usize,
    pub resolver_enabled: bool,
    pub resolver_base_url: String,
    pub resolver_timeout_secs: u64,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            structure_column: "SMILES".to_string(),
            rule: RuleId::Lipinski,
            chunk_size: DEFAULT_CHUNK_SIZE,
            resolver_enabled: false,
            resolver_base_url: "https://pubchem.ncbi.nlm.nih.gov/rest/pug".to_string(),
            resolver_timeout_secs: 10,
        }
    }
}
