mod common;

use anyhow::Result;
use common::{test_service, StandardCompanies};
use fattura::application::{AppError, ErrorKind};
use fattura::domain::CompanyPatch;

#[tokio::test]
async fn test_create_then_get_round_trip() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let created = service
        .create_company("apple", "Apple Computer", Some("Maker of OSX"))
        .await?;
    assert_eq!(created.code, "apple");
    assert_eq!(created.name, "Apple Computer");
    assert_eq!(created.description.as_deref(), Some("Maker of OSX"));

    let detail = service.get_company("apple").await?;
    assert_eq!(detail.company, created);
    assert!(detail.invoices.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_list_preserves_creation_order() -> Result<()> {
    let (service, _temp) = test_service().await?;
    StandardCompanies::create_basic(&service).await?;
    service.create_company("acme", "Acme Corp", None).await?;

    let companies = service.list_companies().await?;
    let codes: Vec<&str> = companies.iter().map(|c| c.code.as_str()).collect();
    assert_eq!(codes, vec!["apple", "ibm", "acme"]);

    Ok(())
}

#[tokio::test]
async fn test_duplicate_code_is_a_conflict() -> Result<()> {
    let (service, _temp) = test_service().await?;
    StandardCompanies::create_basic(&service).await?;

    let err = service
        .create_company("apple", "Apple Inc", None)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::CompanyExists(ref code) if code == "apple"));
    assert_eq!(err.kind(), ErrorKind::Conflict);

    // The original row is untouched
    let detail = service.get_company("apple").await?;
    assert_eq!(detail.company.name, "Apple Computer");

    Ok(())
}

#[tokio::test]
async fn test_create_rejects_empty_fields() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let err = service.create_company("", "Apple", None).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);

    let err = service
        .create_company("apple", "   ", None)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);

    assert!(service.list_companies().await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_get_unknown_company_is_not_found() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let err = service.get_company("nonexistent").await.unwrap_err();
    assert!(matches!(err, AppError::CompanyNotFound(_)));
    assert_eq!(err.kind(), ErrorKind::NotFound);

    Ok(())
}

#[tokio::test]
async fn test_partial_update_retains_omitted_fields() -> Result<()> {
    let (service, _temp) = test_service().await?;
    StandardCompanies::create_basic(&service).await?;

    // Only the name changes; the description must survive
    let updated = service
        .update_company(
            "apple",
            CompanyPatch {
                name: Some("Apple Inc".into()),
                description: None,
            },
        )
        .await?;
    assert_eq!(updated.name, "Apple Inc");
    assert_eq!(updated.description.as_deref(), Some("Maker of OSX"));

    // Only the description changes; the name must survive
    let updated = service
        .update_company(
            "apple",
            CompanyPatch {
                name: None,
                description: Some("Maker of macOS".into()),
            },
        )
        .await?;
    assert_eq!(updated.name, "Apple Inc");
    assert_eq!(updated.description.as_deref(), Some("Maker of macOS"));

    Ok(())
}

#[tokio::test]
async fn test_update_with_empty_payload_is_a_validation_error() -> Result<()> {
    let (service, _temp) = test_service().await?;
    StandardCompanies::create_basic(&service).await?;

    let err = service
        .update_company("apple", CompanyPatch::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);

    Ok(())
}

#[tokio::test]
async fn test_update_unknown_company_is_not_found() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let err = service
        .update_company(
            "ghost",
            CompanyPatch {
                name: Some("Ghost".into()),
                description: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::CompanyNotFound(_)));

    Ok(())
}

#[tokio::test]
async fn test_delete_company() -> Result<()> {
    let (service, _temp) = test_service().await?;
    StandardCompanies::create_basic(&service).await?;

    service.delete_company("ibm").await?;

    let err = service.get_company("ibm").await.unwrap_err();
    assert!(matches!(err, AppError::CompanyNotFound(_)));
    assert_eq!(service.list_companies().await?.len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_delete_unknown_company_is_not_found() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let err = service.delete_company("ghost").await.unwrap_err();
    assert!(matches!(err, AppError::CompanyNotFound(_)));

    Ok(())
}

#[tokio::test]
async fn test_delete_while_referenced_is_a_conflict() -> Result<()> {
    let (service, _temp) = test_service().await?;
    StandardCompanies::create_basic(&service).await?;
    let invoice = service.create_invoice("apple", 10000).await?;

    let err = service.delete_company("apple").await.unwrap_err();
    assert!(matches!(
        err,
        AppError::CompanyHasInvoices { ref code, count: 1 } if code == "apple"
    ));
    assert_eq!(err.kind(), ErrorKind::Conflict);

    // The company row remains
    assert!(service.get_company("apple").await.is_ok());

    // Deleting the invoice first unblocks the company delete
    service.delete_invoice(invoice.id).await?;
    service.delete_company("apple").await?;
    assert!(matches!(
        service.get_company("apple").await.unwrap_err(),
        AppError::CompanyNotFound(_)
    ));

    Ok(())
}
