//! Synthetic command transcripts for the demo endpoints.
//!
//! Every line carries one of the bracketed tags from [`LogTag`]; consumers
//! color lines by tag, so the markers must stay verbatim.

use chrono::{DateTime, SecondsFormat, Utc};
use indexmap::IndexMap;
use scriptdeck_types::LogTag::{self, Error, Info, Success, Warning};
use serde_json::Value;

type Payload = IndexMap<String, Value>;

/// Accumulates tagged lines.
#[derive(Default)]
struct Transcript(String);

impl Transcript {
    fn push(&mut self, tag: LogTag, message: impl AsRef<str>) -> &mut Self {
        self.0.push_str(&tag.line(message));
        self.0.push('\n');
        self
    }

    fn blank(&mut self) -> &mut Self {
        self.0.push('\n');
        self
    }

    fn finish(self) -> String {
        self.0
    }
}

fn text(payload: &Payload, key: &str) -> String {
    match payload.get(key) {
        None | Some(Value::Null) => "unspecified".to_string(),
        Some(Value::String(value)) => value.clone(),
        Some(other) => other.to_string(),
    }
}

fn flag(payload: &Payload, key: &str) -> bool {
    match payload.get(key) {
        Some(Value::Bool(value)) => *value,
        Some(Value::String(value)) => matches!(value.as_str(), "true" | "yes" | "1"),
        _ => false,
    }
}

fn list(payload: &Payload, key: &str) -> Vec<String> {
    match payload.get(key) {
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| item.as_str().map(str::to_string).unwrap_or_else(|| item.to_string()))
            .collect(),
        Some(Value::String(value)) if !value.is_empty() => value.split(',').map(|item| item.trim().to_string()).collect(),
        _ => Vec::new(),
    }
}

fn iso(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Picks the transcript for `endpoint` by substring, falling back to the
/// generic one.
pub fn render(endpoint: &str, payload: &Payload, now: DateTime<Utc>) -> String {
    if endpoint.contains("/network/status") {
        network_status(payload)
    } else if endpoint.contains("/network/diagnostics") {
        network_diagnostics(payload)
    } else if endpoint.contains("/network/config/update") {
        config_update(payload, now)
    } else if endpoint.contains("/system/disk/analyze") {
        disk_analysis(payload)
    } else if endpoint.contains("/system/disk/cleanup") {
        disk_cleanup(payload)
    } else if endpoint.contains("/system/service/status") {
        service_status(payload, now)
    } else if endpoint.contains("/system/service/action") {
        service_action(payload, now)
    } else if endpoint.contains("/security/scan") {
        security_scan(payload)
    } else {
        generic(endpoint, payload)
    }
}

/// Transcript returned when the collaborator simulates a failure.
pub fn failure() -> String {
    let mut out = Transcript::default();
    out.push(Error, "Failed to execute script")
        .push(Error, "Connection to server timed out")
        .push(Error, "Please check your network connection and try again");
    out.finish()
}

fn generic(endpoint: &str, payload: &Payload) -> String {
    let parameters = serde_json::to_string(payload).unwrap_or_else(|_| "{}".to_string());
    let mut out = Transcript::default();
    out.push(Info, format!("Executing script at {endpoint}"))
        .push(Info, format!("Parameters: {parameters}"))
        .push(Success, "Script executed successfully");
    out.finish()
}

fn network_status(payload: &Payload) -> String {
    let ip = text(payload, "device_ip");
    let check = text(payload, "check_type");
    let mut out = Transcript::default();
    out.push(Info, format!("Checking network status for device {ip}"))
        .push(Info, format!("Check type: {check}, Timeout: {}s", text(payload, "timeout")))
        .push(Info, "Initializing connection...");

    match check.as_str() {
        "ping" => {
            out.push(Info, format!("PING {ip} ({ip}) 56(84) bytes of data."));
            for (seq, time) in [(1, "0.045"), (2, "0.046"), (3, "0.042"), (4, "0.044")] {
                out.push(Info, format!("64 bytes from {ip}: icmp_seq={seq} ttl=64 time={time} ms"));
            }
            out.push(Success, format!("--- {ip} ping statistics ---"))
                .push(Success, "4 packets transmitted, 4 received, 0% packet loss, time 3060ms")
                .push(Success, "rtt min/avg/max/mdev = 0.042/0.044/0.046/0.001 ms");
        }
        "tcp" => {
            out.push(Info, format!("Attempting to establish TCP connection to {ip}..."))
                .push(Info, "Connection established successfully.")
                .push(Info, "Running port scan...")
                .push(Success, "Port 22 (SSH): OPEN")
                .push(Success, "Port 80 (HTTP): OPEN")
                .push(Success, "Port 443 (HTTPS): OPEN")
                .push(Warning, "Port 3389 (RDP): OPEN - Consider closing if not in use");
        }
        _ => {
            out.push(Info, format!("Sending HTTP request to {ip}..."))
                .push(Info, "HTTP/1.1 200 OK")
                .push(Success, "Response received in 235ms")
                .push(Success, "Server is up and running");
        }
    }
    out.finish()
}

fn network_diagnostics(payload: &Payload) -> String {
    let level = text(payload, "diagnostic_level");
    let include_logs = flag(payload, "include_logs");
    let mut out = Transcript::default();
    out.push(Info, format!("Running {level} diagnostics on {}", text(payload, "device_ip")))
        .push(Info, format!("Log collection: {}", if include_logs { "Enabled" } else { "Disabled" }))
        .blank()
        .push(Info, "Phase 1: Connectivity Check")
        .push(Info, "Testing ICMP connectivity...")
        .push(Success, "ICMP connectivity: OK")
        .push(Info, "Phase 2: Interface Status")
        .push(Info, "Checking interface status...")
        .push(Info, "eth0: UP")
        .push(Info, "eth1: UP");

    if level == "advanced" || level == "comprehensive" {
        out.blank()
            .push(Info, "Phase 3: Route Analysis")
            .push(Info, "Analyzing routing table...")
            .push(Info, "Default route: 192.168.1.1")
            .push(Info, "Static routes: 2")
            .push(Info, "Dynamic routes: 5");
    }
    if level == "comprehensive" {
        out.blank()
            .push(Info, "Phase 4: Deep Packet Inspection")
            .push(Info, "Capturing packets on eth0...")
            .push(Info, "Analyzing packet loss...")
            .push(Warning, "1.2% packet loss detected on eth0")
            .push(Info, "Analyzing network latency...")
            .push(Info, "Average latency: 3.5ms");
    }
    if include_logs {
        out.blank()
            .push(Info, "Phase 5: Log Collection")
            .push(Info, "Collecting system logs...")
            .push(Info, "Retrieved 256 log entries")
            .push(Warning, "Found 3 warning events in logs")
            .push(Error, "Found 1 error event in logs");
    }
    out.blank().push(Success, "Diagnostics completed successfully");
    out.finish()
}

fn config_update(payload: &Payload, now: DateTime<Utc>) -> String {
    let router = text(payload, "router_id");
    let mut out = Transcript::default();
    out.push(Info, format!("Connecting to router {router}..."))
        .push(Info, "Connection established")
        .push(Info, format!("Loading {} configuration template", text(payload, "config_file")));
    if payload.get("parameters").is_some_and(|value| !value.is_null() && value.as_str() != Some("")) {
        out.push(Info, "Applying custom parameters")
            .push(Info, "Validating parameters...")
            .push(Success, "Parameters validated successfully");
    }
    out.push(Info, "Backing up current configuration...")
        .push(Success, format!("Backup saved to /backups/{router}-{}.cfg", now.format("%Y-%m-%d")))
        .push(Info, "Applying new configuration...")
        .push(Info, "Updating routing tables...")
        .push(Info, "Updating firewall rules...")
        .push(Info, "Updating QoS settings...")
        .push(Success, "Configuration updated successfully")
        .push(Info, "Testing new configuration...")
        .push(Success, "All tests passed");
    out.finish()
}

fn disk_analysis(payload: &Payload) -> String {
    let path = text(payload, "path");
    let mut out = Transcript::default();
    out.push(Info, format!("Connecting to {}...", text(payload, "hostname")))
        .push(Info, format!("Analyzing disk usage for {path}"))
        .blank()
        .push(Info, "Filesystem      Size  Used  Avail  Use%  Mounted on")
        .push(Info, format!("/dev/sda1       100G   76G    24G   76%  {path}"))
        .blank()
        .push(Info, "Top disk space consumers:")
        .push(Info, "24G  /var/log")
        .push(Info, "18G  /var/lib/docker")
        .push(Info, "15G  /home")
        .push(Info, "12G  /usr")
        .push(Warning, "/var/log consuming 24% of disk space")
        .blank()
        .push(Info, "Files by age:")
        .push(Info, "> 1 year old:  15G")
        .push(Info, "6-12 months:   22G")
        .push(Info, "1-6 months:    30G")
        .push(Info, "< 1 month:     9G")
        .blank()
        .push(Success, "Analysis completed");
    out.finish()
}

fn disk_cleanup(payload: &Payload) -> String {
    let dry_run = flag(payload, "dry_run");
    let file_types = list(payload, "file_types");
    let types_label = if file_types.is_empty() { "all".to_string() } else { file_types.join(", ") };

    let mut out = Transcript::default();
    out.push(Info, format!("Connecting to {}...", text(payload, "hostname")))
        .push(Info, format!("Initializing cleanup for {}", text(payload, "path")))
        .push(
            Info,
            format!("Parameters: Files older than {} days, Types: {types_label}", text(payload, "older_than")),
        );
    if dry_run {
        out.push(Info, "DRY RUN MODE - No files will be deleted");
    } else {
        out.push(Warning, "LIVE MODE - Files will be permanently deleted");
    }
    out.blank().push(Info, "Scanning for files...").push(Info, "Found 1,245 matching files (8.5GB)").blank();

    let groups = [
        ("log", "log", "Processing log files...", 863, "5.2GB"),
        ("tmp", "temporary", "Processing temporary files...", 215, "1.8GB"),
        ("bak", "backup", "Processing backup files...", 42, "1.2GB"),
        ("cache", "cache", "Processing cache files...", 125, "0.3GB"),
    ];
    for (key, noun, heading, count, size) in groups {
        if !file_types.iter().any(|file_type| file_type == key) {
            continue;
        }
        out.push(Info, heading).push(Info, format!("Found {count} {noun} files ({size})"));
        if dry_run {
            out.push(Info, format!("Would delete {count} {noun} files ({size})"));
        } else {
            out.push(Success, format!("Deleted {count} {noun} files ({size})"));
        }
        out.blank();
    }

    if dry_run {
        out.push(Success, "Dry run completed. Would free 8.5GB of space if executed");
    } else {
        out.push(Success, "Cleanup completed. Freed 8.5GB of disk space");
    }
    out.finish()
}

fn service_status(payload: &Payload, now: DateTime<Utc>) -> String {
    let service = text(payload, "service_name");
    let mut out = Transcript::default();
    out.push(Info, format!("Connecting to {}...", text(payload, "hostname")))
        .push(Info, format!("Checking status of service '{service}'..."))
        .blank()
        .push(Info, format!("● {service}.service - {service} Service"))
        .push(
            Info,
            format!("   Loaded: loaded (/lib/systemd/system/{service}.service; enabled; vendor preset: enabled)"),
        )
        .push(Info, format!("   Active: active (running) since {}", iso(now)))
        .push(
            Info,
            format!(" Process: 1234 ExecStart=/usr/bin/{service} --config /etc/{service}/config.yml"),
        )
        .push(Info, "   Memory: 125.6M (limit: 500.0M)")
        .push(Info, "     CPU: 2.5%")
        .blank()
        .push(Success, "Service is running normally");
    out.finish()
}

fn service_action(payload: &Payload, now: DateTime<Utc>) -> String {
    let service = text(payload, "service_name");
    let action = text(payload, "action");
    let started = iso(now);
    let mut out = Transcript::default();
    out.push(Info, format!("Connecting to {}...", text(payload, "hostname")))
        .push(Info, format!("Executing '{action}' on service '{service}'..."))
        .blank()
        .push(Info, format!("Executing: systemctl {action} {service}"));

    match action.as_str() {
        "start" => {
            out.push(Info, format!("Starting {service}.service..."))
                .push(Success, format!("Started {service}.service"))
                .blank()
                .push(Info, format!("● {service}.service - {service} Service"))
                .push(Info, format!("   Active: active (running) since {started}"))
                .push(Info, format!("   Process: 1234 ExecStart=/usr/bin/{service}"))
                .push(Success, "Service started successfully");
        }
        "stop" => {
            out.push(Info, format!("Stopping {service}.service..."))
                .push(Success, format!("Stopped {service}.service"))
                .blank()
                .push(Info, format!("● {service}.service - {service} Service"))
                .push(Info, format!("   Active: inactive (dead) since {started}"))
                .push(Success, "Service stopped successfully");
        }
        "restart" => {
            out.push(Info, format!("Stopping {service}.service..."))
                .push(Info, format!("Stopped {service}.service"))
                .push(Info, format!("Starting {service}.service..."))
                .push(Success, format!("Started {service}.service"))
                .blank()
                .push(Info, format!("● {service}.service - {service} Service"))
                .push(Info, format!("   Active: active (running) since {started}"))
                .push(Info, format!("   Process: 1235 ExecStart=/usr/bin/{service}"))
                .push(Success, "Service restarted successfully");
        }
        _ => {
            out.push(Warning, format!("Unknown service action '{action}'"));
        }
    }
    out.finish()
}

fn security_scan(payload: &Payload) -> String {
    let scan_type = text(payload, "scan_type");
    let options = list(payload, "scan_options");
    let has_option = |name: &str| options.iter().any(|option| option == name);

    let mut out = Transcript::default();
    out.push(
        Info,
        format!("Initializing {scan_type} security scan on target: {}", text(payload, "target")),
    );
    if options.is_empty() {
        out.push(Info, "No additional scan options specified");
    } else {
        out.push(Info, format!("Scan options: {}", options.join(", ")));
    }
    out.blank()
        .push(Info, "Phase 1: Host Discovery")
        .push(Info, "Target is up and running")
        .push(Info, "MAC Address: 00:1A:2B:3C:4D:5E")
        .blank()
        .push(Info, "Phase 2: Port Scanning");

    match scan_type.as_str() {
        "quick" => {
            out.push(Info, "Scanning top 100 ports...")
                .push(Info, "22/tcp   open   ssh")
                .push(Info, "80/tcp   open   http")
                .push(Info, "443/tcp  open   https")
                .push(Warning, "3389/tcp open   rdp     (Consider closing if not required)")
                .blank();
        }
        "full" | "port" => {
            out.push(Info, "Scanning all 65535 ports (this may take some time)...")
                .push(Info, "22/tcp     open   ssh")
                .push(Info, "80/tcp     open   http")
                .push(Info, "443/tcp    open   https")
                .push(Info, "3306/tcp   open   mysql")
                .push(Warning, "3389/tcp   open   rdp     (Consider closing if not required)")
                .push(Warning, "5432/tcp   open   postgres")
                .push(Warning, "8080/tcp   open   http-alt")
                .push(Error, "21/tcp     open   ftp     (Insecure protocol, recommend disabling)")
                .blank();
        }
        _ => {}
    }
    if has_option("os") {
        out.push(Info, "Phase 3: OS Detection")
            .push(Info, "OS: Linux 5.4.0 (Ubuntu 20.04 LTS)")
            .push(Info, "Confidence: 98%")
            .blank();
    }
    if has_option("version") {
        out.push(Info, "Phase 4: Service Version Detection")
            .push(Info, "22/tcp: OpenSSH 8.2p1")
            .push(Info, "80/tcp: nginx 1.18.0")
            .push(Info, "443/tcp: nginx 1.18.0")
            .push(Warning, "OpenSSH 8.2p1 has known vulnerabilities")
            .blank();
    }
    if scan_type == "vuln" || has_option("script") {
        out.push(Info, "Phase 5: Vulnerability Scanning")
            .push(Info, "Running vulnerability scripts...")
            .push(Warning, "CVE-2021-28041: OpenSSH 8.2p1 vulnerable to memory corruption")
            .push(Warning, "CVE-2021-44228: Log4j vulnerability detected in web service")
            .push(Error, "CVE-2022-0778: Critical OpenSSL vulnerability detected")
            .blank();
    }
    out.push(Success, "Security scan completed")
        .push(Info, "Found 4 warnings and 2 critical issues");
    out.finish()
}
