//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `studentbook_core` linkage.
//! - Exercise one create/list/delete cycle against an in-memory store.

use studentbook_core::{KvStudentRepository, MemoryKvStore, StudentDraft, StudentRepository};

fn main() {
    println!("studentbook_core ping={}", studentbook_core::ping());
    println!("studentbook_core version={}", studentbook_core::core_version());

    let repo = KvStudentRepository::new(MemoryKvStore::new());
    let outcome = repo
        .create_student(StudentDraft::new("Smoke Test", "X", "TKJ"))
        .and_then(|student| {
            let listed = repo.list_students()?.len();
            repo.delete_student(&student.id)?;
            Ok((listed, repo.list_students()?.len()))
        });

    match outcome {
        Ok((after_create, after_delete)) => println!(
            "studentbook_core store=ok after_create={after_create} after_delete={after_delete}"
        ),
        Err(err) => {
            eprintln!("studentbook_core store=error error={err}");
            std::process::exit(1);
        }
    }
}
