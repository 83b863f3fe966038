use anyhow::Context;
use caguard_domain::model::Policy;
use caguard_settings::DocFormat;
use camino::Utf8Path;

/// Format implied by a document path's extension; YAML when unknown.
pub fn format_for(path: &str) -> DocFormat {
    Utf8Path::new(path)
        .extension()
        .and_then(DocFormat::from_extension)
        .unwrap_or(DocFormat::Yaml)
}

/// Parse one policy document.
pub fn parse_policy(text: &str, format: DocFormat) -> anyhow::Result<Policy> {
    let policy: Policy = match format {
        DocFormat::Yaml => serde_yaml::from_str(text).context("parse policy YAML")?,
        DocFormat::Json => serde_json::from_str(text).context("parse policy JSON")?,
    };
    if policy.name.trim().is_empty() {
        anyhow::bail!("policy name must not be empty");
    }
    Ok(policy)
}

/// Parse a list of names: JSON/YAML string list, or one entry per line for
/// anything else (blank lines and `#` comments skipped).
pub fn parse_name_list(text: &str, path: &str) -> anyhow::Result<Vec<String>> {
    let ext = Utf8Path::new(path).extension().unwrap_or_default();
    match DocFormat::from_extension(ext) {
        Some(DocFormat::Yaml) => Ok(serde_yaml::from_str(text).context("parse YAML name list")?),
        Some(DocFormat::Json) => Ok(serde_json::from_str(text).context("parse JSON name list")?),
        None => Ok(text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty() && !l.starts_with('#'))
            .map(str::to_string)
            .collect()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const POLICY_JSON: &str = r#"{
        "name": "en-prd-ca-admins-mfa-001",
        "displayName": "Admins MFA",
        "state": "enabled",
        "metadata": {"owner": "o", "createdBy": "c", "ticketId": "T-1", "justification": "j"},
        "conditions": {"users": {"includeGroups": ["Admins"]}},
        "grantControls": {"operator": "OR", "builtInControls": ["mfa"]}
    }"#;

    #[test]
    fn parses_json_policy() {
        let p = parse_policy(POLICY_JSON, DocFormat::Json).expect("parse");
        assert_eq!(p.name, "en-prd-ca-admins-mfa-001");
        assert!(p.grant_controls.has_control("mfa"));
    }

    #[test]
    fn yaml_parser_accepts_json_text() {
        assert!(parse_policy(POLICY_JSON, DocFormat::Yaml).is_ok());
    }

    #[test]
    fn blank_name_is_rejected() {
        let text = POLICY_JSON.replace("en-prd-ca-admins-mfa-001", " ");
        let err = parse_policy(&text, DocFormat::Json).unwrap_err();
        assert!(err.to_string().contains("must not be empty"));
    }

    #[test]
    fn format_follows_extension() {
        assert_eq!(format_for("a/b.json"), DocFormat::Json);
        assert_eq!(format_for("a/b.yml"), DocFormat::Yaml);
        assert_eq!(format_for("noext"), DocFormat::Yaml);
    }

    #[test]
    fn name_list_formats() {
        let txt = "# tenant groups\nFinance\n\n  HR  \n";
        assert_eq!(parse_name_list(txt, "groups.txt").expect("txt"), vec!["Finance", "HR"]);
        assert_eq!(
            parse_name_list("[\"A\", \"B\"]", "groups.json").expect("json"),
            vec!["A", "B"]
        );
        assert_eq!(parse_name_list("- A\n- B\n", "groups.yaml").expect("yaml"), vec!["A", "B"]);
        assert!(parse_name_list("{\"a\": 1}", "groups.json").is_err());
    }
}
