use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use crm_config::CrmConfig;
use crm_core::document::SchemaDocument;
use crm_core::notifications::NotificationLog;
use crm_schema::{ParsedSchema, ParsedSchemaCache, builtin_document, load_document};

/// Where the active schema document came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SchemaSource {
    Builtin,
    File { path: PathBuf },
}

/// Shared resources initialized once per invocation.
pub struct AppContext {
    pub config: CrmConfig,
    pub source: SchemaSource,
    pub notifications: NotificationLog,
    document: Arc<SchemaDocument>,
    parsed: ParsedSchemaCache,
}

impl AppContext {
    /// Resolve the schema document (flag, then config, then built-in) and parse it.
    pub fn init(config: CrmConfig, schema_flag: Option<&Path>) -> anyhow::Result<Self> {
        let source = match schema_flag {
            Some(path) => SchemaSource::File {
                path: path.to_path_buf(),
            },
            None => config
                .schema
                .document_path()
                .map_or(SchemaSource::Builtin, |path| SchemaSource::File { path }),
        };

        let document = match &source {
            SchemaSource::Builtin => builtin_document(),
            SchemaSource::File { path } => Arc::new(
                load_document(path, config.schema.validate_on_load)
                    .with_context(|| format!("failed to load schema {}", path.display()))?,
            ),
        };

        let notifications = NotificationLog::new(config.notifications.capacity);
        let ctx = Self {
            config,
            source,
            notifications,
            document,
            parsed: ParsedSchemaCache::new(),
        };

        let schema = ctx.schema();
        tracing::debug!(
            source = ?ctx.source,
            sections = schema.sections().len(),
            fields = schema.len(),
            "schema ready"
        );

        Ok(ctx)
    }

    /// The parsed active schema; parsed once and shared afterwards.
    #[must_use]
    pub fn schema(&self) -> Arc<ParsedSchema> {
        self.parsed.get_or_parse(&self.document)
    }
}
