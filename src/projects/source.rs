use futures_util::future::LocalBoxFuture;
use url::Url;

use crate::error::FetchError;

use super::model::ApiRepo;

const GITHUB_API_BASE: &str = "https://api.github.com/";
pub const GITHUB_ACCEPT: &str = "application/vnd.github+json";

pub trait RepoSource {
    /// Most recently updated public repositories, in server order.
    fn list_repos(&self) -> LocalBoxFuture<'_, Result<Vec<ApiRepo>, FetchError>>;
}

pub fn repos_endpoint(github_user: &str, per_page: usize) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(GITHUB_API_BASE)?;

    url.path_segments_mut()
        .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
        .pop_if_empty()
        .extend(["users", github_user, "repos"]);
    url.query_pairs_mut()
        .append_pair("sort", "updated")
        .append_pair("per_page", &per_page.to_string());

    Ok(url)
}

pub fn classify_status(status: u16) -> Result<(), FetchError> {
    if status == 403 {
        return Err(FetchError::RateLimited);
    }

    if !(200..300).contains(&status) {
        return Err(FetchError::Status(status));
    }

    Ok(())
}
