use std::sync::Arc;

use crate::domain::types::PostCategory;
use crate::presentation::views::{
    BrandView, FooterView, LayoutChrome, NavigationLinkView, NavigationView, PageMetaView,
};

/// Site-wide identity used by the layout and the Atom feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteProfile {
    pub title: String,
    pub description: String,
    pub public_url: String,
    pub footer_copy: String,
}

impl SiteProfile {
    /// Public URL with exactly one trailing slash.
    pub fn base_url(&self) -> String {
        let trimmed = self.public_url.trim_end_matches('/');
        format!("{trimmed}/")
    }
}

#[derive(Clone)]
pub struct ChromeService {
    profile: Arc<SiteProfile>,
}

impl ChromeService {
    pub fn new(profile: Arc<SiteProfile>) -> Self {
        Self { profile }
    }

    pub fn load(&self) -> LayoutChrome {
        let mut entries = vec![NavigationLinkView {
            label: "All Posts".to_string(),
            href: "/blog".to_string(),
        }];
        entries.extend(PostCategory::ALL.into_iter().map(|category| {
            NavigationLinkView {
                label: category.display_name().to_string(),
                href: format!("/blog/category/{}", category.url_key()),
            }
        }));
        entries.push(NavigationLinkView {
            label: "Broadcasts".to_string(),
            href: "/blog/broadcasts".to_string(),
        });

        LayoutChrome {
            brand: BrandView {
                title: self.profile.title.clone(),
                href: "/blog".to_string(),
            },
            navigation: NavigationView { entries },
            footer: FooterView {
                copy: self.profile.footer_copy.clone(),
            },
            meta: PageMetaView {
                title: self.profile.title.clone(),
                description: self.profile.description.clone(),
                canonical: self.profile.base_url(),
                feed_href: "/blog/atom.xml".to_string(),
            },
        }
    }
}
