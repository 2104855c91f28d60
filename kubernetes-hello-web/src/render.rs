//! HTML page rendering
//!
//! Every value is HTML-escaped; multi-line values rely on
//! `white-space: pre-wrap`.

use std::fmt::Write;

use kubernetes_hello_core::{NameValuePair, Snapshot};

use crate::handlers::RequestInfo;

const STYLE: &str = r"body {
    font-family: monospace;
    color: #555;
    background: #e6edf4;
    padding: 1.25rem;
    margin: 0;
}
table {
    background: #fff;
    border: .0625rem solid #c4cdda;
    border-radius: 0 0 .25rem .25rem;
    border-spacing: 0;
    margin-bottom: 1.25rem;
    padding: .75rem 1.25rem;
    text-align: left;
    width: 100%;
}
table > caption {
    background: #f1f6fb;
    text-align: left;
    font-weight: bold;
    padding: .75rem 1.25rem;
    border: .0625rem solid #c4cdda;
    border-radius: .25rem .25rem 0 0;
    border-bottom: 0;
}
table td, table th {
    padding: .25rem;
    white-space: pre-wrap;
}
table td {
    overflow-wrap: anywhere;
}
table > tbody > tr:hover {
    background: #f1f6fb;
}
";

/// Render the diagnostic page.
///
/// Request headers and environment are always shown; secrets, configs and
/// zone sections only when they have rows.
pub fn index_page(request: &RequestInfo, snapshot: &Snapshot) -> String {
    let properties = &snapshot.properties;
    let optional_id = |id: Option<u32>| id.map(|id| id.to_string()).unwrap_or_default();

    let mut html = String::with_capacity(16 * 1024);
    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<title>kubernetes-hello</title>\n<style>\n");
    html.push_str(STYLE);
    html.push_str("</style>\n</head>\n<body>\n");

    html.push_str("    <table>\n        <caption>Properties</caption>\n        <tbody>\n");
    for (name, value) in [
        ("Pid", properties.pid.to_string()),
        ("Uid", optional_id(properties.uid)),
        ("Gid", optional_id(properties.gid)),
        ("Request", request.request.clone()),
        ("Client Address", request.client_address.clone()),
        ("Server Address", request.server_address.clone()),
        ("Hostname", properties.hostname.clone()),
        ("Pod Containers", properties.pod_containers.clone()),
        ("Os", properties.os.to_string()),
        ("Architecture", properties.architecture.to_string()),
        ("Uptime", properties.uptime.clone()),
    ] {
        let _ = writeln!(
            html,
            "            <tr><th>{name}</th><td>{}</td></tr>",
            escape_html(&value)
        );
    }
    html.push_str("        </tbody>\n    </table>\n");

    push_table(&mut html, "Request Headers", &request.headers);
    push_table(&mut html, "Environment Variables", &snapshot.environment);
    if !snapshot.secrets.is_empty() {
        push_table(&mut html, "Secrets", &snapshot.secrets);
    }
    if !snapshot.configs.is_empty() {
        push_table(&mut html, "Configs", &snapshot.configs);
    }
    for section in snapshot.zones.iter().filter(|s| !s.pairs.is_empty()) {
        push_table(&mut html, &section.title(), &section.pairs);
    }

    html.push_str("</body>\n</html>\n");
    html
}

fn push_table(html: &mut String, caption: &str, pairs: &[NameValuePair]) {
    let _ = writeln!(
        html,
        "    <table>\n        <caption>{}</caption>\n        <tbody>",
        escape_html(caption)
    );
    for pair in pairs {
        let _ = writeln!(
            html,
            "            <tr>\n                <th>{}</th>\n                <td>{}</td>\n            </tr>",
            escape_html(&pair.name),
            escape_html(&pair.value)
        );
    }
    html.push_str("        </tbody>\n    </table>\n");
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&#34;"),
            '\'' => escaped.push_str("&#39;"),
            '\0' => escaped.push('\u{fffd}'),
            c => escaped.push(c),
        }
    }
    escaped
}
