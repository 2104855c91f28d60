//! End-to-end scans over temporary directory trees.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use kubernetes_hello_core::services::{
    CertificateDecoder, CommandCertificateDecoder, ContentClassifier, DirectoryScanner,
};
use kubernetes_hello_core::{CoreResult, ScanPolicy};

struct FixedDecoder(&'static str);

#[async_trait]
impl CertificateDecoder for FixedDecoder {
    async fn decode(&self, _pem: &[u8]) -> CoreResult<String> {
        Ok(self.0.to_string())
    }
}

fn scanner(decoder: Arc<dyn CertificateDecoder>) -> DirectoryScanner {
    DirectoryScanner::new(ContentClassifier::new(decoder), ScanPolicy::Degrade)
}

fn relative(name: &str) -> &str {
    name.splitn(4, ' ').nth(3).unwrap_or_default()
}

fn openssl_available() -> bool {
    std::process::Command::new("openssl")
        .arg("version")
        .output()
        .is_ok_and(|output| output.status.success())
}

fn write(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, contents).unwrap();
}

#[tokio::test]
async fn two_visible_files_and_a_hidden_one() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write(root, "config.txt", "hello");
    write(
        root,
        "cert.pem",
        "-----BEGIN CERTIFICATE-----\nMIIB\n-----END CERTIFICATE-----\n",
    );
    write(root, ".secret/ignored.txt", "nope");

    let pairs = scanner(Arc::new(FixedDecoder("Certificate:\n    Data:")))
        .scan(root)
        .await
        .unwrap();

    assert_eq!(pairs.len(), 2);
    assert_eq!(relative(&pairs[0].name), "cert.pem");
    assert_eq!(pairs[0].value, "Certificate:\n    Data:");
    assert_eq!(relative(&pairs[1].name), "config.txt");
    assert_eq!(pairs[1].value, "hello");
}

#[tokio::test]
async fn service_account_token_is_decoded() {
    let dir = tempfile::tempdir().unwrap();
    // {"alg":"RS256"} . {"iss":"kubernetes/serviceaccount"}
    let token = "eyJhbGciOiJSUzI1NiJ9.eyJpc3MiOiJrdWJlcm5ldGVzL3NlcnZpY2VhY2NvdW50In0.c2ln";
    write(dir.path(), "kubernetes.io/serviceaccount/token", token);
    write(dir.path(), "kubernetes.io/serviceaccount/namespace", "default");

    let pairs = scanner(Arc::new(FixedDecoder("")))
        .scan(dir.path())
        .await
        .unwrap();

    let names: Vec<_> = pairs.iter().map(|p| relative(&p.name)).collect();
    assert_eq!(
        names,
        vec![
            "kubernetes.io/serviceaccount/namespace",
            "kubernetes.io/serviceaccount/token",
        ]
    );
    assert_eq!(
        pairs[1].value,
        format!(
            "header: {{\n  \"alg\": \"RS256\"\n}}\n\npayload: {{\n  \"iss\": \"kubernetes/serviceaccount\"\n}}\n\n{token}"
        )
    );
}

#[tokio::test]
async fn sorted_output_is_stable_across_scans() {
    let dir = tempfile::tempdir().unwrap();
    for name in ["b", "a/z", "a/b", "C", "_x"] {
        write(dir.path(), name, name);
    }
    let scanner = scanner(Arc::new(FixedDecoder("")));
    let first = scanner.scan(dir.path()).await.unwrap();
    let second = scanner.scan(dir.path()).await.unwrap();

    assert_eq!(first, second);
    assert!(first.windows(2).all(|w| w[0].name.as_bytes() <= w[1].name.as_bytes()));
}

#[tokio::test]
async fn real_openssl_renders_certificate() {
    if !openssl_available() {
        eprintln!("Skipping test: openssl is not installed");
        return;
    }

    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("configs");
    std::fs::create_dir(&root).unwrap();
    let status = std::process::Command::new("openssl")
        .args(["req", "-x509", "-newkey", "rsa:2048", "-nodes", "-days", "1"])
        .args(["-subj", "/CN=kubernetes-hello"])
        .arg("-keyout")
        .arg(dir.path().join("key.pem"))
        .arg("-out")
        .arg(root.join("ca.crt"))
        .output()
        .unwrap()
        .status;
    assert!(status.success());

    let pairs = scanner(Arc::new(CommandCertificateDecoder::openssl()))
        .scan(&root)
        .await
        .unwrap();

    assert_eq!(pairs.len(), 1);
    assert!(pairs[0].value.contains("Certificate:"), "unexpected value: {}", pairs[0].value);
    assert!(pairs[0].value.contains("CN = kubernetes-hello") || pairs[0].value.contains("CN=kubernetes-hello"));
}

#[tokio::test]
async fn garbage_certificate_is_reported_inline() {
    if !openssl_available() {
        eprintln!("Skipping test: openssl is not installed");
        return;
    }

    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "broken.crt", "-----BEGIN CERTIFICATE-----\nnot base64\n");

    let pairs = scanner(Arc::new(CommandCertificateDecoder::openssl()))
        .scan(dir.path())
        .await
        .unwrap();

    assert!(pairs[0].value.starts_with("ERROR openssl exit status: 1"), "unexpected value: {}", pairs[0].value);
}
