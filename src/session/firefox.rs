use async_trait::async_trait;
use tracing::{debug, trace};

use crate::browser::{Element, Tab, Window};
use crate::error::Result;

use super::{BrowserSession, ElementHandle, PageSession};

#[async_trait]
impl ElementHandle for Element {
    async fn text(&self) -> Result<String> {
        self.get_text().await
    }

    async fn attribute(&self, name: &str) -> Result<Option<String>> {
        self.get_attribute(name).await
    }

    async fn click(&self) -> Result<()> {
        Element::click(self).await
    }
}

#[async_trait]
impl PageSession for Tab {
    type Element = Element;

    async fn navigate(&self, url: &str) -> Result<()> {
        self.goto(url).await?;

        match self.current_url().await {
            Ok(landed) if landed != url => debug!(requested = url, %landed, "Navigation redirected"),
            Ok(_) => {}
            Err(e) => trace!(error = %e, "Could not read URL after navigation"),
        }
        Ok(())
    }

    async fn find_all(&self, selector: &str) -> Result<Vec<Element>> {
        self.find_elements(selector).await
    }

    async fn find_first(&self, selector: &str) -> Result<Option<Element>> {
        self.find_element(selector).await
    }
}

#[async_trait]
impl BrowserSession for Window {
    type Page = Tab;

    fn page(&self) -> Tab {
        self.tab()
    }

    async fn close(&self) -> Result<()> {
        Window::close(self).await
    }
}
