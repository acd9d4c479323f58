#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[allow(dead_code)]
pub const CMD_TIMEOUT: Duration = Duration::from_secs(15);

#[allow(dead_code)]
pub const APEX_PAGE: &str = r#"<!DOCTYPE html>
<html><body>
<div id="toc">
  <ul>
    <li><a href="apex_ref.htm">Apex Reference</a>
      <ul><li><a href="trig.htm">Trigger</a></li></ul>
    </li>
    <li><a href="soql.htm">SOQL</a></li>
  </ul>
</div>
</body></html>"#;

#[allow(dead_code)]
pub const VF_PAGE: &str =
    r#"<div class="toc"><a href="pages_compref.htm">Standard Component Reference</a></div>"#;

#[allow(dead_code)]
pub const CONSOLE_TOC: &str =
    r#"<toc><tocentry text="Methods for Primary Tabs" href="sforce_api_console_methods_tabs.htm"/></toc>"#;

/// Create a configured `sfref` command suitable for integration tests.
///
/// Points at an empty settings file so the developer's own settings never
/// leak into a test run.
#[allow(dead_code)]
pub fn sfref_cmd(config: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("sfref"));
    cmd.timeout(CMD_TIMEOUT);
    cmd.env("SFREF_CONFIG", config);
    cmd.env("NO_COLOR", "1");
    cmd.env_remove("BROWSER");
    cmd
}

/// Write a settings file that routes every doc-type to `server`, plus any
/// `extra` TOML appended to each doc-type table.
#[allow(dead_code)]
pub fn write_settings(dir: &Path, server: &MockServer, extra: &[(&str, &str)]) -> PathBuf {
    let mut content = String::from("fetchTimeoutSecs = 5\n");
    for (name, dir_name, file) in [
        ("apex", "apex", "apex_dev_guide.htm"),
        ("visualforce", "pages", "pages_intro.htm"),
        ("serviceconsole", "console", "toc.xml"),
    ] {
        content.push_str(&format!(
            "\n[docTypes.{name}]\nsourceUrl = \"{uri}/{dir_name}/{file}\"\nbaseUrl = \"{uri}/{dir_name}/\"\n",
            uri = server.uri()
        ));
        for (doc_type, line) in extra {
            if *doc_type == name {
                content.push_str(line);
                content.push('\n');
            }
        }
    }
    let path = dir.join("settings.toml");
    fs::write(&path, content).expect("failed to write settings");
    path
}

/// Serve the three documentation sets. `None` bodies answer with HTTP 500.
#[allow(dead_code)]
pub async fn mount_docs(
    server: &MockServer,
    apex: Option<&str>,
    visualforce: Option<&str>,
    console: Option<&str>,
) {
    for (route, body) in [
        ("/apex/apex_dev_guide.htm", apex),
        ("/pages/pages_intro.htm", visualforce),
        ("/console/toc.xml", console),
    ] {
        let response = body.map_or_else(
            || ResponseTemplate::new(500),
            |body| ResponseTemplate::new(200).set_body_string(body),
        );
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(response)
            .mount(server)
            .await;
    }
}
