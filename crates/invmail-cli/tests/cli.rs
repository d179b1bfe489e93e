use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};
use predicates::prelude::*;
use tempfile::TempDir;

const MAIL_CONFIG: &str = "\
[mail]
from = Billing <billing@example.com>
subject_template = Invoice {invoice_number}
body_template = Hello,
    please find invoice {invoice_number} for order {order_number} attached.
    Total: {total_ttc}

[sendemail]
smtpserver = 127.0.0.1
smtpserverport = 9
smtpuser =
smtppass =
smtptls = none
smtptimeout = 2
";

fn invoice_pdf(lines: &[&str]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut operations = vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec!["F1".into(), 12.into()]),
        Operation::new("Td", vec![50.into(), 750.into()]),
    ];
    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            operations.push(Operation::new("Td", vec![0.into(), (-20).into()]));
        }
        operations.push(Operation::new("Tj", vec![Object::string_literal(*line)]));
    }
    operations.push(Operation::new("ET", vec![]));

    let content = Content { operations };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut data = Vec::new();
    doc.save_to(&mut data).unwrap();
    data
}

/// Temporary directory holding a PDF, a mail config and an order mapping.
struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new(order: &str) -> Self {
        let dir = TempDir::new().unwrap();
        let order_line = format!("Order: {order}");
        fs::write(
            dir.path().join("INV-001.pdf"),
            invoice_pdf(&["Invoice No: INV-001", &order_line, "Total: 150.00"]),
        )
        .unwrap();
        fs::write(dir.path().join("mail.ini"), MAIL_CONFIG).unwrap();
        fs::write(
            dir.path().join("orders.map"),
            "# order mapping\nABC-123:a@x.com,b@x.com\n",
        )
        .unwrap();
        Self { dir }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("invmail").unwrap();
        cmd.arg("--pdf")
            .arg(self.path("INV-001.pdf"))
            .arg("--mail-config")
            .arg(self.path("mail.ini"))
            .arg("--map")
            .arg(self.path("orders.map"));
        cmd
    }
}

fn arg(path: &Path) -> &str {
    path.to_str().unwrap()
}

#[test]
fn test_mode_prints_preview() {
    let fixture = Fixture::new("ABC-123");

    fixture
        .command()
        .arg("--test")
        .assert()
        .success()
        .stdout(predicate::str::contains("EMAIL PREVIEW"))
        .stdout(predicate::str::contains("To: a@x.com, b@x.com"))
        .stdout(predicate::str::contains("Subject: Invoice INV-001"))
        .stdout(predicate::str::contains(
            "please find invoice INV-001 for order ABC-123 attached.",
        ))
        .stdout(predicate::str::contains("Total: 150.00"))
        .stdout(predicate::str::contains("- INV-001.pdf ("));
}

#[test]
fn dry_run_alias_is_accepted() {
    let fixture = Fixture::new("ABC-123");

    fixture
        .command()
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("Subject: Invoice INV-001"));
}

#[test]
fn unknown_order_fails_without_preview() {
    let fixture = Fixture::new("ZZZ-999");

    fixture
        .command()
        .arg("--test")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("EMAIL PREVIEW").not())
        .stderr(predicate::str::contains("resolve recipients failed"))
        .stderr(predicate::str::contains("ZZZ-999"));
}

#[test]
fn declined_confirmation_sends_nothing() {
    let fixture = Fixture::new("ABC-123");

    fixture
        .command()
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Sending cancelled"))
        .stderr(predicate::str::contains("Send this email to 2 recipient(s)? (y/N)"));
}

#[test]
fn unreachable_server_is_a_dispatch_failure() {
    let fixture = Fixture::new("ABC-123");

    fixture
        .command()
        .arg("--yes")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("dispatch failed"));
}

#[test]
fn missing_pdf_fails() {
    let fixture = Fixture::new("ABC-123");
    let missing = fixture.path("missing.pdf");

    Command::cargo_bin("invmail")
        .unwrap()
        .args(["--pdf", arg(&missing)])
        .args(["--mail-config", arg(&fixture.path("mail.ini"))])
        .args(["--map", arg(&fixture.path("orders.map"))])
        .arg("--test")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("read PDF failed"));
}

#[test]
fn missing_mail_config_key_names_section_and_key() {
    let fixture = Fixture::new("ABC-123");
    fs::write(
        fixture.path("mail.ini"),
        "[mail]\nfrom = billing@example.com\nsubject_template = s\n\n[sendemail]\nsmtpserver = h\nsmtpserverport = 25\nsmtpuser = u\nsmtppass = p\n",
    )
    .unwrap();

    fixture
        .command()
        .arg("--test")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("load mail config failed"))
        .stderr(predicate::str::contains("body_template"));
}

#[test]
fn unknown_parser_is_a_usage_error() {
    let fixture = Fixture::new("ABC-123");

    fixture
        .command()
        .args(["--parser", "nope", "--test"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("dougs"));
}

#[test]
fn alternate_parser_rejects_dougs_layout() {
    let fixture = Fixture::new("ABC-123");

    fixture
        .command()
        .args(["--parser", "alternate", "--test"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("extract fields failed"));
}
