use super::*;

#[test]
fn test_repository_ref_ignores_extra_fields() {
    let repo: RepositoryRef = serde_json::from_str(
        r#"{
            "id": 1296269,
            "name": "widgets",
            "full_name": "acme/widgets",
            "private": false,
            "owner": {"login": "acme"}
        }"#,
    )
    .unwrap();

    assert_eq!(repo.full_name, "acme/widgets");
    assert_eq!(repo.id, Some(1296269));
    assert_eq!(repo.private, Some(false));
}

#[test]
fn test_repository_ref_requires_full_name() {
    let result = serde_json::from_str::<RepositoryRef>(r#"{"id": 1, "name": "widgets"}"#);

    assert!(result.is_err());
}
