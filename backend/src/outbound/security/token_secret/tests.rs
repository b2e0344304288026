//! Unit tests for token secret loading.

use super::*;
use mockable::MockEnv;
use rstest::rstest;
use std::collections::HashMap;
use uuid::Uuid;

#[derive(Debug)]
struct TempSecretFile {
    path: PathBuf,
}

impl TempSecretFile {
    fn new(contents: &[u8]) -> std::io::Result<Self> {
        let path = std::env::temp_dir().join(format!("token-secret-{}", Uuid::new_v4()));
        std::fs::write(&path, contents)?;
        Ok(Self { path })
    }

    fn path_str(&self) -> String {
        self.path.to_string_lossy().into_owned()
    }
}

impl Drop for TempSecretFile {
    fn drop(&mut self) {
        drop(std::fs::remove_file(&self.path));
    }
}

fn mock_env(vars: HashMap<&'static str, String>) -> MockEnv {
    let mut env = MockEnv::new();
    env.expect_string()
        .times(0..)
        .returning(move |key| vars.get(key).cloned());
    env
}

fn missing_path() -> String {
    std::env::temp_dir()
        .join(format!("token-secret-missing-{}", Uuid::new_v4()))
        .to_string_lossy()
        .into_owned()
}

#[rstest]
#[case(BuildMode::Debug)]
#[case(BuildMode::Release)]
fn reads_secret_from_file(#[case] mode: BuildMode) {
    let file = TempSecretFile::new(&[b'k'; 40]).expect("secret file");
    let env = mock_env(HashMap::from([(SECRET_FILE_ENV, file.path_str())]));

    let secret = token_secret_from_env(&env, mode).expect("secret loads");
    assert_eq!(secret.as_bytes(), &[b'k'; 40]);
}

#[rstest]
fn trailing_newlines_are_not_key_material() {
    let mut contents = vec![b'k'; 32];
    contents.extend_from_slice(b"\r\n");
    let file = TempSecretFile::new(&contents).expect("secret file");
    let env = mock_env(HashMap::from([(SECRET_FILE_ENV, file.path_str())]));

    let secret = token_secret_from_env(&env, BuildMode::Release).expect("secret loads");
    assert_eq!(secret.as_bytes().len(), 32);
}

#[rstest]
#[case(BuildMode::Debug)]
#[case(BuildMode::Release)]
fn short_secrets_are_rejected(#[case] mode: BuildMode) {
    let file = TempSecretFile::new(&[b'k'; 16]).expect("secret file");
    let env = mock_env(HashMap::from([(SECRET_FILE_ENV, file.path_str())]));

    let err = token_secret_from_env(&env, mode).expect_err("too short");
    assert!(matches!(
        err,
        TokenSecretError::TooShort {
            length: 16,
            min_len: TOKEN_SECRET_MIN_LEN
        }
    ));
}

#[rstest]
fn debug_builds_fall_back_to_an_ephemeral_secret() {
    let env = mock_env(HashMap::from([(SECRET_FILE_ENV, missing_path())]));
    let secret = token_secret_from_env(&env, BuildMode::Debug).expect("ephemeral");
    assert_eq!(secret.as_bytes().len(), EPHEMERAL_SECRET_LEN);
}

#[rstest]
fn release_builds_refuse_a_missing_secret() {
    let env = mock_env(HashMap::from([(SECRET_FILE_ENV, missing_path())]));
    let err = token_secret_from_env(&env, BuildMode::Release).expect_err("must fail");
    assert!(matches!(err, TokenSecretError::EphemeralNotAllowed { .. }));
}

#[rstest]
#[case("1")]
#[case("true")]
#[case("YES")]
fn release_builds_accept_an_explicit_ephemeral_opt_in(#[case] flag: &str) {
    let env = mock_env(HashMap::from([
        (SECRET_FILE_ENV, missing_path()),
        (ALLOW_EPHEMERAL_ENV, flag.to_owned()),
    ]));
    assert!(token_secret_from_env(&env, BuildMode::Release).is_ok());
}

#[rstest]
fn invalid_ephemeral_flag_is_rejected() {
    let env = mock_env(HashMap::from([(ALLOW_EPHEMERAL_ENV, "maybe".to_owned())]));
    let err = token_secret_from_env(&env, BuildMode::Debug).expect_err("bad flag");
    assert!(matches!(
        err,
        TokenSecretError::InvalidEnv {
            name: ALLOW_EPHEMERAL_ENV,
            ..
        }
    ));
}

#[rstest]
fn ephemeral_secrets_differ() {
    assert_ne!(
        TokenSecret::ephemeral().as_bytes(),
        TokenSecret::ephemeral().as_bytes()
    );
}

#[rstest]
fn debug_output_is_redacted() {
    let secret = TokenSecret::from_bytes(vec![b'k'; 32]).expect("long enough");
    assert_eq!(format!("{secret:?}"), "TokenSecret(<redacted>)");
}

#[rstest]
fn process_environment_names_the_secret_file() {
    let file = TempSecretFile::new(&[b'p'; 36]).expect("secret file");
    let _guard = env_lock::lock_env([
        (SECRET_FILE_ENV, Some(file.path_str())),
        (ALLOW_EPHEMERAL_ENV, None),
    ]);

    let secret = token_secret_from_env(&mockable::DefaultEnv::new(), BuildMode::Release)
        .expect("secret loads from the process environment");
    assert_eq!(secret.as_bytes(), &[b'p'; 36]);
}
