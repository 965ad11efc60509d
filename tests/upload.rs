use field_overlay::error::AppErrorCode;
use anyhow::anyhow;
use field_overlay::files::{
    store_upload, upload_document, validate_pdf_upload, DocumentDataType, ObjectStore,
    StorageTransport,
};
use field_overlay::settings::Settings;
use lopdf::{dictionary, Document, Object};
use std::cell::RefCell;

fn pdf_bytes(encrypted: bool) -> Vec<u8> {
    let mut document = Document::with_version("1.5");
    let pages_id = document.new_object_id();
    let page_id = document.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
    });
    document.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
        }),
    );
    let catalog_id = document.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    document.trailer.set("Root", catalog_id);
    if encrypted {
        let encrypt_id = document.add_object(dictionary! {
            "Filter" => "Standard",
            "V" => 1,
            "R" => 2,
        });
        document.trailer.set("Encrypt", encrypt_id);
    }

    let mut bytes = Vec::new();
    document.save_to(&mut bytes).unwrap();
    bytes
}

#[derive(Default)]
struct RecordingStore {
    names: RefCell<Vec<String>>,
}

impl ObjectStore for RecordingStore {
    fn put(&self, file_name: &str, _bytes: &[u8]) -> anyhow::Result<String> {
        self.names.borrow_mut().push(file_name.to_string());
        Ok(format!("uploads/{file_name}"))
    }
}

struct FailingStore;

impl ObjectStore for FailingStore {
    fn put(&self, _file_name: &str, _bytes: &[u8]) -> anyhow::Result<String> {
        Err(anyhow!("bucket offline"))
    }
}

#[test]
fn accepts_plain_pdf_and_appends_extension() {
    let upload = validate_pdf_upload("contract", pdf_bytes(false), 50).unwrap();
    assert_eq!(upload.file_name, "contract.pdf");
    assert_eq!(upload.page_count, 1);

    let upload = validate_pdf_upload("lease.pdf", pdf_bytes(false), 50).unwrap();
    assert_eq!(upload.file_name, "lease.pdf");

    let upload = validate_pdf_upload("Lease.PDF", pdf_bytes(false), 50).unwrap();
    assert_eq!(upload.file_name, "Lease.PDF.pdf");
}

#[test]
fn rejects_empty_upload() {
    let error = validate_pdf_upload("empty.pdf", Vec::new(), 50).unwrap_err();
    assert_eq!(error.code, AppErrorCode::InvalidRequest);
}

#[test]
fn rejects_oversized_upload() {
    let error = validate_pdf_upload("big.pdf", vec![0u8; 1024 * 1024 + 1], 1).unwrap_err();
    assert_eq!(error.code, AppErrorCode::LimitExceeded);
    assert_eq!(error.to_rest_api_error().status, 400);
}

#[test]
fn rejects_non_pdf() {
    let error = validate_pdf_upload("notes.txt", b"just some text".to_vec(), 50).unwrap_err();
    assert_eq!(error.code, AppErrorCode::InvalidDocumentFile);
}

#[test]
fn rejects_encrypted_pdf() {
    let error = validate_pdf_upload("secret.pdf", pdf_bytes(true), 50).unwrap_err();
    assert_eq!(error.code, AppErrorCode::InvalidDocumentFile);
}

#[test]
fn database_transport_stores_base64_inline() {
    let upload = validate_pdf_upload("a.pdf", pdf_bytes(false), 50).unwrap();
    let store = RecordingStore::default();

    let data = store_upload(&upload, StorageTransport::Database, &store).unwrap();

    assert_eq!(data.data_type, DocumentDataType::Bytes64);
    assert!(store.names.borrow().is_empty());
    assert!(!data.data.is_empty());
}

#[test]
fn s3_transport_stores_object_key() {
    let upload = validate_pdf_upload("b", pdf_bytes(false), 50).unwrap();
    let store = RecordingStore::default();

    let data = store_upload(&upload, StorageTransport::S3, &store).unwrap();

    assert_eq!(data.data_type, DocumentDataType::S3Path);
    assert_eq!(data.data, "uploads/b.pdf");
    assert_eq!(store.names.borrow().as_slice(), ["b.pdf".to_string()]);
}

#[test]
fn upload_follows_configured_transport() {
    let store = RecordingStore::default();
    let settings = Settings {
        storage_transport: StorageTransport::S3,
        ..Settings::default()
    };

    let data = upload_document(&settings, "deed", pdf_bytes(false), &store).unwrap();

    assert_eq!(data.data_type, DocumentDataType::S3Path);
    assert_eq!(data.data, "uploads/deed.pdf");

    let data = upload_document(&Settings::default(), "deed", pdf_bytes(false), &store).unwrap();
    assert_eq!(data.data_type, DocumentDataType::Bytes64);
    assert_eq!(store.names.borrow().len(), 1);
}

#[test]
fn upload_honours_configured_size_limit() {
    let settings = Settings {
        upload_size_limit_mb: 0,
        ..Settings::default()
    };

    let error = upload_document(&settings, "a.pdf", pdf_bytes(false), &RecordingStore::default())
        .unwrap_err();

    assert_eq!(error.code, AppErrorCode::LimitExceeded);
}

#[test]
fn store_failure_is_unknown_error() {
    let settings = Settings {
        storage_transport: StorageTransport::S3,
        ..Settings::default()
    };

    let error = upload_document(&settings, "a.pdf", pdf_bytes(false), &FailingStore).unwrap_err();

    assert_eq!(error.code, AppErrorCode::UnknownError);
    assert_eq!(error.to_rest_api_error().status, 500);
}
