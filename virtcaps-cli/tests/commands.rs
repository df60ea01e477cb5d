//! Integration tests for the inspector commands

use std::path::PathBuf;

use virtcaps::{ConnectionContext, ErrorKind};
use virtcaps_cli::{run, Arguments, Command, Report};

fn fixture(name: &str) -> String {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../virtcaps/tests/data")
        .join(name)
        .display()
        .to_string()
}

fn ctx() -> ConnectionContext {
    ConnectionContext::new("test:///default")
}

fn command(args: &[&str]) -> Command {
    Arguments::parse(args.iter().copied()).unwrap().command
}

#[test]
fn test_host_report() {
    let file = fixture("test-qemu-with-kvm.xml");
    let data = run(&ctx(), &command(&["host", &file])).unwrap();

    assert_eq!(data["uuid"], "34a4c2f0-77d5-11e0-8c71-001e4f30a5c1");
    assert_eq!(data["cpu"]["model"], "core2duo");
    assert_eq!(data["has_install_options"], true);
    assert_eq!(data["kvm_available"], true);
    assert_eq!(data["guests"][0]["os_type"], "hvm");
    assert_eq!(data["lookup"]["arch"], "x86_64");
    assert_eq!(data["lookup"]["domain_type"], "kvm");
}

#[test]
fn test_host_report_with_arch() {
    let file = fixture("test-qemu-with-kvm.xml");
    let data = run(&ctx(), &command(&["host", &file, "--arch", "arm"])).unwrap();
    assert_eq!(data["lookup"]["emulator"], "/usr/bin/qemu-system-arm");
    assert_eq!(data["lookup"]["kvm"], false);
}

#[test]
fn test_host_report_empty_host() {
    let file = fixture("test-empty.xml");
    let data = run(&ctx(), &command(&["host", &file])).unwrap();
    assert_eq!(data["has_install_options"], false);
    assert!(data["lookup"].is_null());

    let err = run(&ctx(), &command(&["host", &file, "--os-type", "linux"])).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unsupported);
    assert!(err.to_string().contains("'xen'"));
}

#[test]
fn test_domain_report() {
    let file = fixture("kvm-x86_64-domcaps.xml");
    let data = run(&ctx(), &command(&["domain", &file])).unwrap();

    assert_eq!(data["arch"], "x86_64");
    assert_eq!(data["uefi_loader"], true);
    assert_eq!(data["uefi_path"], "/usr/share/edk2/ovmf/OVMF_CODE.fd");
    assert_eq!(data["loaders"][0]["label"], "BIOS");
    assert_eq!(
        data["loaders"][1]["label"],
        "UEFI x86_64: /usr/share/edk2/ovmf/OVMF_CODE.fd"
    );
    let models = data["cpu_models"].as_array().unwrap();
    assert!(models.iter().any(|m| m == "SandyBridge"));
}

#[test]
fn test_firmware_labels() {
    let file = fixture("kvm-x86_64-domcaps.xml");
    let data = run(&ctx(), &command(&["firmware", &file, "/foobar"])).unwrap();
    assert_eq!(data.as_array().unwrap().len(), 1);
    assert_eq!(data[0]["label"], "Custom: /foobar");

    let file = fixture("kvm-aarch64-domcaps.xml");
    let data = run(&ctx(), &command(&["firmware", &file])).unwrap();
    assert_eq!(data[0]["label"], "None");
}

#[test]
fn test_missing_file_is_source_error() {
    let err = run(&ctx(), &command(&["domain", "/nonexistent/domcaps.xml"])).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Source);
    assert!(err.to_string().contains("/nonexistent/domcaps.xml"));

    let report = Report::failure(&err);
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["success"], false);
    assert_eq!(json["error"]["kind"], "Source");
}

#[test]
fn test_wrong_document_kind() {
    let file = fixture("lxc.xml");
    let err = run(&ctx(), &command(&["domain", &file])).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Document);
}
