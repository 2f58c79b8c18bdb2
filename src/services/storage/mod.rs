pub mod supabase;

pub use supabase::SupabasePublisher;

use async_trait::async_trait;

use crate::errors::PipelineResult;
use crate::models::Artifact;

/// Object store boundary. Returns the public URL of the stored object.
#[async_trait]
pub trait ArtifactPublisher: Send + Sync {
    async fn publish(&self, artifact: Artifact) -> PipelineResult<String>;
}
