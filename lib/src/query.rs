use crate::{
    document::Indexable,
    snapshot::{DocId, Snapshot},
    token::Tokens,
};

/// One exact-match clause against a tagged field.
#[derive(Clone, Debug, PartialEq)]
pub struct TermClause<F> {
    pub field: F,
    pub value: String,
}

/// Compound boolean query.
///
/// `keywords` is tokenized with the index's own pipeline; every token
/// but the last must match a keyword term exactly, the last token
/// matches as a prefix (type-ahead). Filters are exact-match clauses.
/// All clauses combine with AND; a query with no clauses at all
/// matches every document. Results are ordered by the sort key stored
/// under `sort` and capped at `limit`.
#[derive(Clone, Debug)]
pub struct SearchQuery<F> {
    pub keywords: String,
    pub filters: Vec<TermClause<F>>,
    pub sort: F,
    pub limit: usize,
}

/// Resolves a query against one snapshot. Returns matching document
/// ids in sort order, already truncated.
pub(crate) fn execute<D: Indexable>(
    snapshot: &Snapshot<D>,
    query: &SearchQuery<D::Field>,
    tokens: Tokens,
) -> Vec<DocId> {
    let mut candidates: Option<Vec<DocId>> = None;

    if let Some((last, rest)) = tokens.split_last() {
        for token in rest {
            match snapshot.term_postings(token.as_str()) {
                Some(postings) => restrict(&mut candidates, postings),
                None => return Vec::new(),
            }
        }

        let prefixed = snapshot.prefix_postings(last.as_str());
        if prefixed.is_empty() {
            return Vec::new();
        }
        restrict(&mut candidates, &prefixed);
    }

    for clause in &query.filters {
        match snapshot.field_postings(clause.field, &clause.value) {
            Some(postings) => restrict(&mut candidates, postings),
            None => return Vec::new(),
        }
    }

    let mut matches = match candidates {
        Some(ids) => ids,
        // No clauses: browse the whole index.
        None => (0..snapshot.len()).collect(),
    };

    matches.sort_unstable_by(|&a, &b| {
        let key_a = snapshot.doc(a).sort_key(query.sort).unwrap_or("");
        let key_b = snapshot.doc(b).sort_key(query.sort).unwrap_or("");
        key_a.cmp(key_b).then_with(|| a.cmp(&b))
    });
    matches.truncate(query.limit);
    matches
}

/// Narrows the candidate set by one more AND clause.
fn restrict(candidates: &mut Option<Vec<DocId>>, postings: &[DocId]) {
    *candidates = Some(match candidates.take() {
        Some(current) => intersect(&current, postings),
        None => postings.to_vec(),
    });
}

/// Intersection of two sorted posting lists.
fn intersect(a: &[DocId], b: &[DocId]) -> Vec<DocId> {
    let mut out = Vec::with_capacity(a.len().min(b.len()));
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                out.push(a[i]);
                i += 1;
                j += 1;
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::intersect;

    #[test]
    fn test_intersect_sorted_lists() {
        assert_eq!(intersect(&[0, 2, 4, 7], &[1, 2, 3, 4]), vec![2, 4]);
        assert_eq!(intersect(&[0, 1], &[2, 3]), Vec::<usize>::new());
        assert_eq!(intersect(&[], &[1]), Vec::<usize>::new());
    }
}
