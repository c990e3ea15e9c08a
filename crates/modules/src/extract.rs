//! Embedded script extraction from module definitions

use serde_json::Value;
use shared::{ModuleDescriptor, ScriptLanguage, ScriptRole};

/// A script body found in a module definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedScript<'a> {
    pub role: ScriptRole,
    pub language: ScriptLanguage,
    pub body: &'a str,
}

impl ExtractedScript<'_> {
    /// `<role>.<ext>`, e.g. `collection.ps1`
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.role.file_stem(), self.language.extension())
    }
}

/// Every non-empty script field the descriptor knows about
pub fn extract_scripts<'a>(
    descriptor: &ModuleDescriptor,
    definition: &'a Value,
) -> Vec<ExtractedScript<'a>> {
    descriptor
        .script_fields
        .iter()
        .filter_map(|field| {
            let body = definition
                .pointer(field.body)
                .and_then(Value::as_str)
                .filter(|b| !b.trim().is_empty())?;
            let declared = definition.pointer(field.script_type).and_then(Value::as_str);
            Some(ExtractedScript {
                role: field.role,
                language: ScriptLanguage::from_declared(declared),
                body,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use shared::ModuleKind;

    #[test]
    fn test_datasource_both_scripts() {
        let def = json!({
            "autoDiscoveryConfig": { "method": { "groovyScript": "println 'ad'" } },
            "collectorAttribute": { "groovyScript": "Get-Date", "scriptType": "powerShell" }
        });
        let scripts = extract_scripts(ModuleKind::DataSource.descriptor(), &def);

        assert_eq!(scripts.len(), 2);
        assert_eq!(scripts[0].file_name(), "discovery.groovy");
        assert_eq!(scripts[0].body, "println 'ad'");
        assert_eq!(scripts[1].file_name(), "collection.ps1");
    }

    #[test]
    fn test_blank_and_missing_scripts_skipped() {
        let def = json!({
            "autoDiscoveryConfig": { "method": { "groovyScript": "   " } },
            "collectorAttribute": { "name": "snmp" }
        });
        assert!(extract_scripts(ModuleKind::DataSource.descriptor(), &def).is_empty());
    }

    #[test]
    fn test_propertysource_script_role() {
        let def = json!({ "groovyScript": "hostProps.set('x','y')", "scriptType": "embed" });
        let scripts = extract_scripts(ModuleKind::PropertySource.descriptor(), &def);
        assert_eq!(scripts.len(), 1);
        assert_eq!(scripts[0].file_name(), "script.groovy");
    }

    #[test]
    fn test_functions_have_no_scripts() {
        let def = json!({ "name": "isLinux", "code": "system.sysinfo =~ \"Linux\"" });
        assert!(extract_scripts(ModuleKind::Function.descriptor(), &def).is_empty());
    }
}
