// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use fattura::application::LedgerService;
use tempfile::TempDir;

/// Helper to create a test service with a temporary database
pub async fn test_service() -> Result<(LedgerService, TempDir)> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("test.db");
    let service = LedgerService::init(db_path.to_str().unwrap()).await?;
    Ok((service, temp_dir))
}

/// Test fixture: a couple of companies every scenario can lean on
pub struct StandardCompanies;

impl StandardCompanies {
    pub async fn create_basic(service: &LedgerService) -> Result<()> {
        service
            .create_company("apple", "Apple Computer", Some("Maker of OSX"))
            .await?;
        service
            .create_company("ibm", "IBM", Some("Big blue"))
            .await?;
        Ok(())
    }
}
