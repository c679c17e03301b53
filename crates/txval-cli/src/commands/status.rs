//! `txval status` command implementation

use uuid::Uuid;

use super::print_projection;
use crate::api::ApiClient;
use crate::error::{CliError, Result};

/// Show the status projection of one job
pub async fn run(server_url: String, job_id: &str) -> Result<()> {
    let job_id: Uuid = job_id
        .parse()
        .map_err(|_| CliError::InvalidJobId(job_id.to_string()))?;

    let client = ApiClient::new(server_url)?;
    let projection = client.job_status(job_id).await?;

    print_projection(&projection);

    Ok(())
}
