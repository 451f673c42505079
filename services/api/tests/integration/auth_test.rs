use chrono::{Duration, Utc};
use eventsync_api::error::ApiServiceError;
use eventsync_api::usecase::auth::{
    LoginInput, LoginUseCase, SignupInput, SignupUseCase, ValidateTokenUseCase,
    VerifySignupOtpInput, VerifySignupOtpUseCase, hash_password, issue_access_token,
};
use eventsync_auth_types::token::validate_access_token;
use uuid::Uuid;

use crate::helpers::{TEST_JWT_SECRET, TestStore, test_otp, test_user};

// ── Signup ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_store_hashed_payload_and_outbox_on_signup() {
    let store = TestStore::new();
    let usecase = SignupUseCase {
        users: store.user_repo(),
        otps: store.otp_repo(),
    };

    usecase
        .execute(SignupInput {
            email: "new@example.com".to_owned(),
            password: "hunter2".to_owned(),
            name: "Newcomer".to_owned(),
        })
        .await
        .unwrap();

    // Account creation is deferred: no user row yet.
    assert!(store.users.lock().unwrap().is_empty());

    let otps = store.otps.lock().unwrap();
    assert_eq!(otps.len(), 1);
    let otp = &otps[0];
    assert_eq!(otp.email, "new@example.com");
    assert_eq!(otp.code.len(), 6);
    assert!(otp.code.chars().all(|c| c.is_ascii_digit()));
    // The raw password is never persisted, only its Argon2id hash.
    assert!(otp.payload.password_hash.starts_with("$argon2id$"));
    assert_ne!(otp.payload.password_hash, "hunter2");

    let outbox = store.outbox.lock().unwrap();
    assert_eq!(outbox.len(), 1);
    assert_eq!(outbox[0].kind, "signup_otp_created");
    assert_eq!(outbox[0].payload["code"], otp.code);
}

#[tokio::test]
async fn should_reject_signup_for_registered_email() {
    let store = TestStore::new();
    store.add_user(test_user("taken@example.com"));
    let usecase = SignupUseCase {
        users: store.user_repo(),
        otps: store.otp_repo(),
    };

    let result = usecase
        .execute(SignupInput {
            email: "taken@example.com".to_owned(),
            password: "pw".to_owned(),
            name: "x".to_owned(),
        })
        .await;

    assert!(matches!(result, Err(ApiServiceError::UserAlreadyExists)));
    assert!(store.otps.lock().unwrap().is_empty());
}

// ── OTP verification ─────────────────────────────────────────────────────────

#[tokio::test]
async fn should_create_user_from_otp_payload_and_issue_token() {
    let store = TestStore::new();
    store.add_otp(test_otp("new@example.com", "482913"));
    let usecase = VerifySignupOtpUseCase {
        users: store.user_repo(),
        otps: store.otp_repo(),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };

    let out = usecase
        .execute(VerifySignupOtpInput {
            email: "new@example.com".to_owned(),
            otp: "482913".to_owned(),
        })
        .await
        .unwrap();

    let users = store.users.lock().unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].id, out.user_id);
    assert_eq!(users[0].email, "new@example.com");
    assert_eq!(users[0].password_hash, "$argon2id$pending");
    assert_eq!(users[0].name, "pending user");
    // The consumed code is gone.
    assert!(store.otps.lock().unwrap().is_empty());

    let info = validate_access_token(&out.access_token, TEST_JWT_SECRET).unwrap();
    assert_eq!(info.user_id, out.user_id);
}

#[tokio::test]
async fn should_reject_wrong_or_expired_code() {
    let store = TestStore::new();
    store.add_otp(test_otp("new@example.com", "482913"));
    let usecase = VerifySignupOtpUseCase {
        users: store.user_repo(),
        otps: store.otp_repo(),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };

    let wrong = usecase
        .execute(VerifySignupOtpInput {
            email: "new@example.com".to_owned(),
            otp: "000000".to_owned(),
        })
        .await;
    assert!(matches!(wrong, Err(ApiServiceError::InvalidOtp)));

    store.otps.lock().unwrap()[0].expires_at = Utc::now() - Duration::seconds(1);
    let expired = usecase
        .execute(VerifySignupOtpInput {
            email: "new@example.com".to_owned(),
            otp: "482913".to_owned(),
        })
        .await;
    assert!(matches!(expired, Err(ApiServiceError::InvalidOtp)));

    // Neither attempt created an account.
    assert!(store.users.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_return_not_found_without_pending_otp() {
    let store = TestStore::new();
    let usecase = VerifySignupOtpUseCase {
        users: store.user_repo(),
        otps: store.otp_repo(),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };

    let result = usecase
        .execute(VerifySignupOtpInput {
            email: "nobody@example.com".to_owned(),
            otp: "482913".to_owned(),
        })
        .await;
    assert!(matches!(result, Err(ApiServiceError::OtpNotFound)));
}

#[tokio::test]
async fn should_reject_otp_verification_for_registered_email() {
    let store = TestStore::new();
    store.add_user(test_user("taken@example.com"));
    store.add_otp(test_otp("taken@example.com", "482913"));
    let usecase = VerifySignupOtpUseCase {
        users: store.user_repo(),
        otps: store.otp_repo(),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };

    let result = usecase
        .execute(VerifySignupOtpInput {
            email: "taken@example.com".to_owned(),
            otp: "482913".to_owned(),
        })
        .await;
    assert!(matches!(result, Err(ApiServiceError::UserAlreadyExists)));
}

// ── Login ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_login_with_correct_password() {
    let store = TestStore::new();
    let mut user = test_user("alice@example.com");
    user.password_hash = hash_password("hunter2").unwrap();
    let user_id = store.add_user(user);
    let usecase = LoginUseCase {
        users: store.user_repo(),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };

    let out = usecase
        .execute(LoginInput {
            email: "alice@example.com".to_owned(),
            password: "hunter2".to_owned(),
        })
        .await
        .unwrap();

    assert_eq!(out.user_id, user_id);
    let info = validate_access_token(&out.access_token, TEST_JWT_SECRET).unwrap();
    assert_eq!(info.user_id, user_id);
}

#[tokio::test]
async fn should_reject_wrong_password_and_unknown_email() {
    let store = TestStore::new();
    let mut user = test_user("alice@example.com");
    user.password_hash = hash_password("hunter2").unwrap();
    store.add_user(user);
    let usecase = LoginUseCase {
        users: store.user_repo(),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };

    let wrong = usecase
        .execute(LoginInput {
            email: "alice@example.com".to_owned(),
            password: "hunter3".to_owned(),
        })
        .await;
    assert!(matches!(wrong, Err(ApiServiceError::InvalidCredentials)));

    let unknown = usecase
        .execute(LoginInput {
            email: "bob@example.com".to_owned(),
            password: "hunter2".to_owned(),
        })
        .await;
    assert!(matches!(unknown, Err(ApiServiceError::UserNotFound)));
}

// ── Token validation ─────────────────────────────────────────────────────────

#[tokio::test]
async fn should_validate_token_of_existing_user() {
    let store = TestStore::new();
    let user_id = store.add_user(test_user("alice@example.com"));
    let (token, exp) = issue_access_token(user_id, TEST_JWT_SECRET).unwrap();
    let usecase = ValidateTokenUseCase {
        users: store.user_repo(),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };

    let out = usecase.execute(&token).await.unwrap();
    assert_eq!(out.user_id, user_id);
    assert_eq!(out.access_token_exp, exp);
}

#[tokio::test]
async fn should_reject_token_of_deleted_user() {
    let store = TestStore::new();
    let (token, _) = issue_access_token(Uuid::new_v4(), TEST_JWT_SECRET).unwrap();
    let usecase = ValidateTokenUseCase {
        users: store.user_repo(),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };

    let result = usecase.execute(&token).await;
    assert!(matches!(result, Err(ApiServiceError::UserNotFound)));
}

#[tokio::test]
async fn should_reject_garbage_token() {
    let store = TestStore::new();
    let usecase = ValidateTokenUseCase {
        users: store.user_repo(),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };

    let result = usecase.execute("not-a-jwt").await;
    assert!(matches!(result, Err(ApiServiceError::Unauthorized)));
}
