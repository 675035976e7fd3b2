mod common;
mod zero_token;
