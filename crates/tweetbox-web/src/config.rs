/// Where the app finds its elements on the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebConfig {
    /// Container the tweet entries are rendered into.
    pub list: String,
    /// Form whose submit adds or updates a tweet.
    pub form: String,
    /// Text input inside the form.
    pub input: String,
    /// Submit control whose label follows the edit mode, looked up inside the form.
    pub submit: String,
    /// Element notices are appended to.
    pub messages: String,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            list: "#tweet-list".into(),
            form: "#form".into(),
            input: "#tweet".into(),
            submit: "input[type=\"submit\"]".into(),
            messages: "#content".into(),
        }
    }
}
