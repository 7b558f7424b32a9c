use std::future::Future;

/// A hosted chat model answering a single user prompt.
pub trait Completion {
    type Error;

    fn model(&self) -> &str;

    fn complete(&self, prompt: &str) -> impl Future<Output = Result<String, Self::Error>>;
}

impl<T: Completion> Completion for &T {
    type Error = T::Error;

    fn model(&self) -> &str {
        (**self).model()
    }

    async fn complete(&self, prompt: &str) -> Result<String, Self::Error> {
        (**self).complete(prompt).await
    }
}
