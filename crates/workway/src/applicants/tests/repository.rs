use super::common::submission;
use crate::applicants::query::{translate, Filter};
use crate::applicants::repository::{ApplicantCollection, ApplicantDocument, MemoryCollection};

fn document(name: &str) -> ApplicantDocument {
    ApplicantDocument::new(submission(name), None, None)
}

#[test]
fn insert_assigns_sequential_unique_ids() {
    let collection = MemoryCollection::default();

    let first = collection.insert(document("A")).expect("insert");
    let second = collection.insert(document("B")).expect("insert");

    assert_eq!(first.0, "apl-000001");
    assert_eq!(second.0, "apl-000002");
    assert_ne!(first, second);
}

#[test]
fn fetch_returns_full_entity_or_none() {
    let collection = MemoryCollection::default();
    let id = collection.insert(document("John Doe")).expect("insert");

    let applicant = collection
        .fetch(&id)
        .expect("collection reachable")
        .expect("record present");
    assert_eq!(applicant.id, id);
    assert_eq!(applicant.name, "John Doe");
    assert!(applicant.cv_reference.is_none());
    assert!(applicant.image_reference.is_none());

    let missing = collection
        .fetch(&crate::applicants::ApplicantId("apl-424242".to_string()))
        .expect("collection reachable");
    assert!(missing.is_none());
}

#[test]
fn fetch_by_name_requires_exact_full_match() {
    let collection = MemoryCollection::default();
    collection.insert(document("John Doe")).expect("insert");

    assert!(collection
        .fetch_by_name("John Doe")
        .expect("collection reachable")
        .is_some());
    assert!(collection
        .fetch_by_name("John")
        .expect("collection reachable")
        .is_none());
    assert!(collection
        .fetch_by_name("john doe")
        .expect("collection reachable")
        .is_none());
}

#[test]
fn find_all_returns_every_record_in_stable_order() {
    let collection = MemoryCollection::default();
    let first = collection.insert(document("A")).expect("insert");
    let second = collection.insert(document("B")).expect("insert");
    let third = collection.insert(document("C")).expect("insert");

    let all = collection.find(&Filter::All).expect("collection reachable");
    let ids: Vec<_> = all.iter().map(|applicant| applicant.id.clone()).collect();
    assert_eq!(ids, vec![first, second, third]);
}

#[test]
fn find_membership_over_tools() {
    let collection = MemoryCollection::default();

    let mut both = submission("Docker And Git");
    both.tools = vec!["Docker".to_string(), "Git".to_string()];
    let both_id = collection
        .insert(ApplicantDocument::new(both, None, None))
        .expect("insert");

    let mut git_only = submission("Git Only");
    git_only.tools = vec!["Git".to_string()];
    let git_only_id = collection
        .insert(ApplicantDocument::new(git_only, None, None))
        .expect("insert");

    let git = translate("tools", "Git").expect("translates");
    let matched: Vec<_> = collection
        .find(&git)
        .expect("collection reachable")
        .into_iter()
        .map(|applicant| applicant.id)
        .collect();
    assert_eq!(matched, vec![both_id.clone(), git_only_id]);

    let docker = translate("tools", "Docker").expect("translates");
    let matched: Vec<_> = collection
        .find(&docker)
        .expect("collection reachable")
        .into_iter()
        .map(|applicant| applicant.id)
        .collect();
    assert_eq!(matched, vec![both_id]);
}

#[test]
fn find_exact_match_on_company() {
    let collection = MemoryCollection::default();

    let mut bmw = submission("At BMW");
    bmw.company = Some("BMW".to_string());
    let bmw_id = collection
        .insert(ApplicantDocument::new(bmw, None, None))
        .expect("insert");

    let mut group = submission("At BMW Group");
    group.company = Some("BMW Group".to_string());
    collection
        .insert(ApplicantDocument::new(group, None, None))
        .expect("insert");

    let filter = translate("company", "BMW").expect("translates");
    let matched = collection.find(&filter).expect("collection reachable");
    assert_eq!(matched.len(), 1);
    assert_eq!(matched[0].id, bmw_id);
}

#[test]
fn documents_preserve_token_order_and_duplicates() {
    let collection = MemoryCollection::default();

    let mut fields = submission("Dup Tools");
    fields.tools = vec!["Git".to_string(), "Docker".to_string(), "Git".to_string()];
    let id = collection
        .insert(ApplicantDocument::new(fields, None, None))
        .expect("insert");

    let applicant = collection
        .fetch(&id)
        .expect("collection reachable")
        .expect("record present");
    assert_eq!(applicant.tools, vec!["Git", "Docker", "Git"]);
}
