use std::path::Path;

use scribe_relay::domain::ScratchPath;

#[test]
fn given_directory_when_generated_then_path_lives_inside_it() {
    let path = ScratchPath::generate(Path::new("/tmp/scratch"), "aac");

    assert_eq!(path.as_path().parent(), Some(Path::new("/tmp/scratch")));
    assert_eq!(path.as_path().extension().unwrap(), "aac");
}

#[test]
fn given_two_generations_when_compared_then_paths_are_unique() {
    let dir = Path::new("/tmp");

    let a = ScratchPath::generate(dir, "mp3");
    let b = ScratchPath::generate(dir, "mp3");

    assert_ne!(a, b);
}

#[test]
fn given_hostile_extension_when_generated_then_falls_back_to_bin() {
    let path = ScratchPath::generate(Path::new("/tmp"), "../../etc/passwd");

    assert_eq!(path.as_path().parent(), Some(Path::new("/tmp")));
    assert_eq!(path.as_path().extension().unwrap(), "bin");
}

#[test]
fn given_leading_dot_when_generated_then_dot_is_not_doubled() {
    let path = ScratchPath::generate(Path::new("/tmp"), ".wav");

    let name = path.as_path().file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("scratch-"));
    assert!(name.ends_with(".wav"));
    assert!(!name.contains(".."));
}
