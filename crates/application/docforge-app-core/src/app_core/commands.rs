#[derive(Debug, Clone)]
pub enum AppCommand {
    // Boot
    LoadInitialState,

    // Auth
    Login { token: String, user_id: String },
    Logout,

    // Generation
    SubmitGeneration {
        owner: String,
        repo: String,
        include_tests: bool,
    },
}
