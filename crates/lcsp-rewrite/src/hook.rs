//! Response Hooks
//!
//! Hooks run once per response, right before it is sent. An [`Exchange`]
//! pairs a request with the response being built and runs the hooks when
//! it is finalized.

use lcsp_caniuse::CaniuseError;
use lcsp_policy::{PolicyExtension, split_policy_list};

use crate::config::RewriteConfig;
use crate::headers::{CONTENT_SECURITY_POLICY, Request, Response};
use crate::rewriter::CspRewriter;

/// Response transform invoked before headers are sent
pub trait ResponseHook: Send + Sync {
    fn on_response(&self, request: &Request, response: &mut Response);
}

/// Rewrites CSP headers for the requesting browser
#[derive(Debug)]
pub struct LegacyCspHook {
    rewriter: CspRewriter,
}

impl LegacyCspHook {
    pub fn new(rewriter: CspRewriter) -> Self {
        Self { rewriter }
    }

    pub fn rewriter(&self) -> &CspRewriter {
        &self.rewriter
    }
}

impl ResponseHook for LegacyCspHook {
    fn on_response(&self, request: &Request, response: &mut Response) {
        if let Some(resolution) = self.rewriter.rewrite(request.user_agent(), &mut response.headers) {
            tracing::debug!(
                method = %request.method,
                url = %request.url,
                level = %resolution.level,
                "rewrote CSP headers"
            );
        }
    }
}

/// Adds configured sources to an existing `Content-Security-Policy`
#[derive(Debug, Clone, Default)]
pub struct ExtendCspHook {
    extension: PolicyExtension,
}

impl ExtendCspHook {
    pub fn new(extension: PolicyExtension) -> Self {
        Self { extension }
    }
}

impl ResponseHook for ExtendCspHook {
    fn on_response(&self, _request: &Request, response: &mut Response) {
        if self.extension.is_empty() || !response.headers.contains(CONTENT_SECURITY_POLICY) {
            return;
        }

        for value in response.headers.remove(CONTENT_SECURITY_POLICY) {
            let extended: Vec<String> = split_policy_list(&value)
                .map(|policy| self.extension.extend_str(policy))
                .collect();
            response.headers.append(CONTENT_SECURITY_POLICY, &extended.join(", "));
        }
    }
}

/// Ordered set of hooks
#[derive(Default)]
pub struct HookChain {
    hooks: Vec<Box<dyn ResponseHook>>,
}

impl HookChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Extension (when configured) followed by the legacy rewrite
    pub fn from_config(config: &RewriteConfig) -> Result<Self, CaniuseError> {
        let mut chain = Self::new();
        let extension = config.extension();
        if !extension.is_empty() {
            chain.register(ExtendCspHook::new(extension));
        }
        chain.register(LegacyCspHook::new(CspRewriter::from_config(config)?));
        Ok(chain)
    }

    pub fn register(&mut self, hook: impl ResponseHook + 'static) {
        self.hooks.push(Box::new(hook));
    }

    pub fn with(mut self, hook: impl ResponseHook + 'static) -> Self {
        self.register(hook);
        self
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Start an exchange for `request`
    pub fn exchange(&self, request: Request) -> Exchange<'_> {
        Exchange {
            hooks: &self.hooks,
            request,
            response: Response::default(),
        }
    }
}

impl std::fmt::Debug for HookChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HookChain").field("hooks", &self.hooks.len()).finish()
    }
}

/// A request and the response being built for it
pub struct Exchange<'a> {
    hooks: &'a [Box<dyn ResponseHook>],
    request: Request,
    response: Response,
}

impl Exchange<'_> {
    pub fn request(&self) -> &Request {
        &self.request
    }

    pub fn response_mut(&mut self) -> &mut Response {
        &mut self.response
    }

    pub fn set_response(&mut self, response: Response) {
        self.response = response;
    }

    /// Run every hook once, in registration order, and hand back the
    /// response ready to send.
    pub fn finalize(mut self) -> Response {
        for hook in self.hooks {
            hook.on_response(&self.request, &mut self.response);
        }
        self.response
    }
}
