use shared::domain::PaperTags;
use storage::PaperArchive;

#[tokio::test]
async fn listing_is_sorted_and_same_name_upload_replaces() {
    let dir = tempfile::tempdir().expect("tempdir");
    let archive = PaperArchive::new(dir.path()).await.expect("archive");

    let physics = PaperTags {
        class_name: "BSc".into(),
        subject: "Physics".into(),
        semester: "1".into(),
        year: "2021".into(),
        exam_type: "Mid".into(),
        medium: "English".into(),
        uploader: "bob".into(),
    };
    let math = PaperTags {
        subject: "Math".into(),
        year: "2020".into(),
        ..physics.clone()
    };

    archive
        .store_paper(&physics, "p.pdf", b"old")
        .await
        .expect("physics");
    archive.store_paper(&math, "m.pdf", b"m").await.expect("math");
    archive
        .store_paper(&physics, "p.pdf", b"new")
        .await
        .expect("physics again");

    let papers = archive.list_papers().await.expect("list");
    let subjects: Vec<_> = papers.iter().map(|p| p.tags.subject.as_str()).collect();
    assert_eq!(subjects, ["Math", "Physics"]);

    let bytes = archive
        .load_file(&papers[1].stored_filename)
        .await
        .expect("load")
        .expect("present");
    assert_eq!(bytes, b"new");
}
