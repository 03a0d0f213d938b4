//! Blog list and single post

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::context::use_app_context;
use crate::lifetime::Lifetime;
use crate::markdown::{excerpt, parse_markdown, resolve_media_url};
use crate::models::Blog;
use crate::route::Route;
use crate::store::{find_blog, published_blogs, use_shop_store, ShopStateStoreFields};

const EXCERPT_CHARS: usize = 160;

fn post_key(blog: &Blog) -> String {
    blog.slug.clone().filter(|s| !s.is_empty()).unwrap_or_else(|| blog.id.clone())
}

#[component]
pub fn BlogListPage() -> impl IntoView {
    let ctx = use_app_context();
    let store = use_shop_store();

    let posts = move || {
        let blogs: Vec<Blog> = store.blogs().with(|all| published_blogs(all).into_iter().cloned().collect());
        if blogs.is_empty() {
            let message = if store.catalog_loaded().get() { "No posts yet." } else { "Loading posts..." };
            return view! { <p class="empty">{message}</p> }.into_any();
        }
        blogs
            .into_iter()
            .map(|blog| {
                let key = post_key(&blog);
                let summary = excerpt(&blog.content, EXCERPT_CHARS);
                view! {
                    <article class="blog-card" on:click=move |_| ctx.navigate(Route::BlogPost(key.clone()))>
                        <h2>{blog.title}</h2>
                        {blog.author.map(|a| view! { <p class="byline">{format!("By {}", a)}</p> })}
                        <p>{summary}</p>
                        <div class="tags">
                            {blog.tags.into_iter().map(|t| view! { <span class="tag">{t}</span> }).collect_view()}
                        </div>
                    </article>
                }
            })
            .collect_view()
            .into_any()
    };

    view! {
        <div class="blog-page">
            <h1>"Health blog"</h1>
            {posts}
        </div>
    }
}

#[component]
pub fn BlogPostPage(key: String) -> impl IntoView {
    let ctx = use_app_context();
    let store = use_shop_store();
    let media = ctx.config.with_value(|c| c.media_base().to_string());
    let full = RwSignal::new(None::<Blog>);

    // List responses may carry a shortened body; load the complete post
    if let Some(id) = store.blogs().with_untracked(|all| find_blog(all, &key).map(|b| b.id.clone())) {
        let api = ctx.public_api();
        let lifetime = Lifetime::for_component();
        spawn_local(async move {
            match lifetime.run(api.resource::<Blog>().get(&id)).await {
                Ok(blog) => full.set(Some(blog)),
                Err(e) if e.is_cancelled() => {}
                Err(e) => tracing::debug!("Keeping listed copy of post {}: {}", id, e),
            }
        });
    }

    let post = move || {
        let listed = || store.blogs().with(|all| find_blog(all, &key).cloned());
        let Some(blog) = full.get().or_else(listed) else {
            return view! { <p class="empty">"Post not found."</p> }.into_any();
        };
        let body = parse_markdown(&blog.content, &media);
        let cover = blog.image.as_deref().map(|i| resolve_media_url(i, &media));
        view! {
            <article class="blog-post">
                {cover.map(|src| view! { <img class="cover" src=src alt="" /> })}
                <h1>{blog.title}</h1>
                {blog.published_at.map(|d| view! { <p class="byline">{d.get(..10).unwrap_or(&d).to_string()}</p> })}
                <div class="markdown-body" inner_html=body></div>
            </article>
        }
        .into_any()
    };

    view! {
        <div class="blog-page">
            <button class="link" on:click=move |_| ctx.navigate(Route::Blog)>"All posts"</button>
            {post}
        </div>
    }
}
