//! Provider adapters.

pub mod apple;
pub mod facebook;
pub mod google;

pub use apple::{
    AppleAdapter, AppleAttempt, AppleAuthorization, AppleAuthorizationService, AppleIdCredential,
    AppleIdRequest, AppleScope, AppleSignIn, AppleSignInUser,
};
pub use facebook::{
    FacebookAdapter, FacebookLoginOutcome, FacebookLoginResponse, FacebookLoginResult,
    FacebookLoginService, FacebookSignIn, FacebookSignInUser, FACEBOOK_PERMISSIONS,
};
pub use google::{
    GoogleAdapter, GoogleSignIn, GoogleSignInResult, GoogleSignInService, GoogleSignInUser,
    GOOGLE_CANCELED_CODE,
};
