use crate::marker::marker_comment;
use crate::rules::{Finding, Location, RuleSettings, RULE_ID};
use crate::ts::{scope_lines, scope_nodes, Scope, SourceDocument};
use std::sync::atomic::{AtomicBool, Ordering};
use tree_sitter::Node;

/// Report every edit marker in the document with default settings.
pub fn scan(doc: &SourceDocument) -> Vec<Finding> {
    scan_with(doc, &RuleSettings::default())
}

pub fn scan_with(doc: &SourceDocument, settings: &RuleSettings) -> Vec<Finding> {
    scan_with_cancel(doc, settings, &AtomicBool::new(false))
}

/// Scan every scope node, checking `cancel` between scopes.
///
/// Findings come back ordered by source position.
pub fn scan_with_cancel(
    doc: &SourceDocument,
    settings: &RuleSettings,
    cancel: &AtomicBool,
) -> Vec<Finding> {
    let mut findings = Vec::new();
    for scope in scope_nodes(doc.root_node()) {
        if cancel.load(Ordering::Relaxed) {
            tracing::debug!(reported = findings.len(), "scan cancelled");
            break;
        }
        findings.extend(check_scope(doc, &scope, settings));
    }
    findings.sort_by_key(|f| f.location.offset);
    findings
}

/// Check a single node. Nodes that are not scopes yield nothing.
pub fn scan_scope(doc: &SourceDocument, node: Node<'_>) -> Vec<Finding> {
    Scope::new(node)
        .map(|scope| check_scope(doc, &scope, &RuleSettings::default()))
        .unwrap_or_default()
}

fn check_scope(doc: &SourceDocument, scope: &Scope<'_>, settings: &RuleSettings) -> Vec<Finding> {
    let source = doc.source();
    let findings: Vec<Finding> = scope_lines(doc, scope)
        .iter()
        .filter_map(|line| marker_comment(line, source))
        .map(|comment| {
            let (line, column) = doc.position(comment.start);
            tracing::debug!(
                line,
                column,
                scope = ?scope.kind,
                comment = comment.text(source),
                "edit marker found"
            );
            Finding {
                rule_id: RULE_ID.to_string(),
                message: settings.message(),
                severity: settings.severity,
                scope: scope.kind,
                location: Location {
                    offset: comment.start,
                    line,
                    column,
                },
            }
        })
        .collect();

    tracing::trace!(
        kind = ?scope.kind,
        start = scope.start(),
        findings = findings.len(),
        "scope checked"
    );
    findings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::Severity;
    use crate::ts::ScopeKind;

    fn wrap_method(body: &str) -> String {
        format!(
            "\n    using System;\n\n    namespace ConsoleApplication1\n    {{\n        class TypeName\n        {{\n            void Hoge()\n            {{\n{body}            }}\n        }}\n    }}"
        )
    }

    #[test]
    fn reports_start_marker_at_comment_position() {
        let source = wrap_method(
            "               //2015-01-01 EDIT START\n               //var a = 100;\n               var a = 120;\n",
        );
        let doc = SourceDocument::parse(source).unwrap();
        let findings = scan(&doc);

        assert_eq!(findings.len(), 1);
        let finding = &findings[0];
        assert_eq!(finding.rule_id, "EditMarker");
        assert_eq!(finding.message, "Detect 'START' comment.");
        assert_eq!(finding.severity, Severity::Error);
        assert_eq!(finding.scope, ScopeKind::FunctionBody);
        assert_eq!((finding.location.line, finding.location.column), (10, 16));
    }

    #[test]
    fn no_marker_no_finding() {
        let source = wrap_method(
            "               // start the server\n               // 2015-01-01 edited\n               Run();\n",
        );
        let doc = SourceDocument::parse(source).unwrap();
        assert!(scan(&doc).is_empty());
    }

    #[test]
    fn trailing_comment_after_code_is_ignored() {
        let source = wrap_method("               Run(); //2015-01-01 EDIT START\n");
        let doc = SourceDocument::parse(source).unwrap();
        assert!(scan(&doc).is_empty());
    }

    #[test]
    fn two_markers_in_one_scope_yield_two_findings() {
        let source = wrap_method(
            "               //2015-01-01 EDIT START\n               A();\n               //2016/02/03 fix start\n               B();\n",
        );
        let doc = SourceDocument::parse(source).unwrap();
        let findings = scan(&doc);
        assert_eq!(findings.len(), 2);
        assert!(findings[0].location.offset < findings[1].location.offset);
    }

    #[test]
    fn markers_in_type_bodies_are_reported() {
        let source = "class A\n{\n    //2015-01-01 EDIT START\n    int x;\n    struct B\n    {\n        // 01/02/2015 start\n        int y;\n    }\n}\nenum E\n{\n    //2015-01-01 start\n    One,\n}\n";
        let doc = SourceDocument::parse(source).unwrap();
        let scopes: Vec<_> = scan(&doc).into_iter().map(|f| f.scope).collect();
        assert_eq!(
            scopes,
            vec![ScopeKind::ClassBody, ScopeKind::StructBody, ScopeKind::EnumBody]
        );
    }

    #[test]
    fn namespace_level_comments_are_not_scopes() {
        let source = "namespace N\n{\n    //2015-01-01 EDIT START\n    class A { }\n}\n";
        let doc = SourceDocument::parse(source).unwrap();
        assert!(scan(&doc).is_empty());
    }

    #[test]
    fn nested_block_marker_reported_once() {
        let source = wrap_method(
            "               if (true)\n               {\n                   //2015-01-01 EDIT START\n                   A();\n               }\n",
        );
        let doc = SourceDocument::parse(source).unwrap();
        assert_eq!(scan(&doc).len(), 1);
    }

    #[test]
    fn custom_settings_flow_into_findings() {
        let source = wrap_method("               //2015-01-01 EDIT START\n               A();\n");
        let doc = SourceDocument::parse(source).unwrap();
        let settings = RuleSettings {
            severity: Severity::Warning,
            message_format: "Remove '{0}' marker".to_string(),
        };
        let findings = scan_with(&doc, &settings);
        assert_eq!(findings[0].severity, Severity::Warning);
        assert_eq!(findings[0].message, "Remove 'START' marker");
    }

    #[test]
    fn cancelled_scan_reports_nothing() {
        let source = wrap_method("               //2015-01-01 EDIT START\n               A();\n");
        let doc = SourceDocument::parse(source).unwrap();
        let cancel = AtomicBool::new(true);
        assert!(scan_with_cancel(&doc, &RuleSettings::default(), &cancel).is_empty());
    }

    #[test]
    fn scan_scope_ignores_non_scope_nodes() {
        let source = wrap_method("               //2015-01-01 EDIT START\n               A();\n");
        let doc = SourceDocument::parse(source).unwrap();
        assert!(scan_scope(&doc, doc.root_node()).is_empty());
    }
}
