//! Read-only query guard.
//!
//! Raw traversal expressions come from outside the adapter and must never
//! mutate the backing store. The guard scans the expression for standalone
//! mutation keywords before anything is sent over the wire.

use orgmap_core::SourceError;

/// Cypher keywords that mutate the graph.
pub const MUTATION_KEYWORDS: &[&str] = &["create", "delete", "detach", "set", "merge", "remove", "drop"];

/// Reject a traversal expression containing a mutation keyword.
///
/// Keywords are matched case-insensitively against whole word tokens, so
/// property names like `reset_count` or values like "dropped" pass.
pub fn ensure_read_only(query: &str) -> Result<(), SourceError> {
    let lowered = query.to_lowercase();
    for token in lowered.split(|c: char| !c.is_alphanumeric() && c != '_') {
        if MUTATION_KEYWORDS.contains(&token) {
            return Err(SourceError::QueryRejected(token.to_string()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_queries_pass() {
        assert!(ensure_read_only("MATCH (n:Function) RETURN n LIMIT 10").is_ok());
        assert!(ensure_read_only("MATCH (a {id: 'x'})-[r]-(b) RETURN a, r, b").is_ok());
    }

    #[test]
    fn every_mutation_keyword_is_rejected() {
        for keyword in MUTATION_KEYWORDS {
            let query = format!("MATCH (n) {} n.x = 1 RETURN n", keyword.to_uppercase());
            let err = ensure_read_only(&query).unwrap_err();
            assert!(matches!(err, SourceError::QueryRejected(k) if k == *keyword));
        }
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert!(ensure_read_only("match (n) DeLeTe n").is_err());
    }

    #[test]
    fn keywords_inside_larger_words_pass() {
        assert!(ensure_read_only("MATCH (n) WHERE n.reset_count > 3 RETURN n").is_ok());
        assert!(ensure_read_only("MATCH (n {state: 'dropped'}) RETURN n").is_ok());
        assert!(ensure_read_only("MATCH (n:Dataset) RETURN n").is_ok());
    }
}
