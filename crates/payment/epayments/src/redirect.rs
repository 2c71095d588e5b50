use url::Url;

pub const LOCATION: &str = "Location";
pub const FOUND: u16 = 302;

/// Browser redirect to the payment page. The hosting web layer turns it into
/// a response and stops handling the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    location: Url,
}

impl Redirect {
    pub fn to(location: &str) -> Result<Self, url::ParseError> {
        Ok(Redirect {
            location: Url::parse(location)?,
        })
    }

    pub fn status(&self) -> u16 {
        FOUND
    }

    pub fn location(&self) -> &str {
        self.location.as_str()
    }

    pub fn header(&self) -> (&'static str, &str) {
        (LOCATION, self.location.as_str())
    }
}
