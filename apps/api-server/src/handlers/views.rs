//! Mapping between wire types and domain values.

use actix_web::{HttpResponse, http::header};

use blogicum_core::domain::{
    Category, Comment, Location, Page, PageRequest, Post, PostDetail, PostSummary, User,
};
use blogicum_core::forms::{
    CategoryForm, CommentForm, LocationForm, PostForm, ProfileForm, PublicationForm,
    RegistrationForm,
};
use blogicum_shared::PageResponse;
use blogicum_shared::dto::{
    CategoryRequest, CategoryResponse, CommentRequest, CommentResponse, LocationRequest,
    LocationResponse, PageQuery, PostDetailResponse, PostRequest, PostResponse,
    PostSummaryResponse, ProfileResponse, PublicationRequest, RegisterUserRequest,
    UpdateProfileRequest, UserResponse,
};

use crate::state::AppState;

pub fn page_request(state: &AppState, page: Option<u64>) -> PageRequest {
    PageRequest::new(page.unwrap_or(1), state.per_page)
}

pub fn page_of(state: &AppState, query: &PageQuery) -> PageRequest {
    page_request(state, query.page)
}

pub fn page_response<T, U>(page: Page<T>, f: impl FnMut(T) -> U) -> PageResponse<U> {
    let total_pages = page.total_pages();
    let page = page.map(f);
    PageResponse {
        items: page.items,
        page: page.page,
        per_page: page.per_page,
        total: page.total,
        total_pages,
    }
}

pub fn post_url(post_id: impl std::fmt::Display) -> String {
    format!("/api/posts/{post_id}")
}

pub fn profile_url(username: &str) -> String {
    format!("/api/profile/{username}")
}

/// 303 to `location` after a successful delete.
pub fn see_other(location: String) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

pub fn user(user: User) -> UserResponse {
    UserResponse {
        id: user.id,
        username: user.username,
        email: user.email,
        first_name: user.first_name,
        last_name: user.last_name,
        is_staff: user.is_staff,
        created_at: user.created_at,
    }
}

pub fn profile(user: User) -> ProfileResponse {
    ProfileResponse {
        id: user.id,
        username: user.username,
        first_name: user.first_name,
        last_name: user.last_name,
        joined_at: user.created_at,
    }
}

pub fn post(post: Post) -> PostResponse {
    PostResponse {
        id: post.id,
        author_id: post.author_id,
        title: post.title,
        text: post.text,
        image: post.image,
        pub_date: post.pub_date,
        is_published: post.is_published,
        category_id: post.category_id,
        location_id: post.location_id,
        created_at: post.created_at,
    }
}

pub fn summary(summary: PostSummary) -> PostSummaryResponse {
    PostSummaryResponse {
        post: post(summary.post),
        comment_count: summary.comment_count,
    }
}

pub fn detail(detail: PostDetail) -> PostDetailResponse {
    PostDetailResponse {
        post: summary(detail.post),
        comments: detail.comments.into_iter().map(comment).collect(),
    }
}

pub fn comment(comment: Comment) -> CommentResponse {
    CommentResponse {
        id: comment.id,
        post_id: comment.post_id,
        author_id: comment.author_id,
        text: comment.text,
        is_published: comment.is_published,
        created_at: comment.created_at,
    }
}

pub fn category(category: Category) -> CategoryResponse {
    CategoryResponse {
        id: category.id,
        title: category.title,
        description: category.description,
        slug: category.slug,
        is_published: category.is_published,
        created_at: category.created_at,
    }
}

pub fn location(location: Location) -> LocationResponse {
    LocationResponse {
        id: location.id,
        name: location.name,
        is_published: location.is_published,
        created_at: location.created_at,
    }
}

pub fn post_form(req: PostRequest) -> PostForm {
    PostForm {
        title: req.title,
        text: req.text,
        image: req.image,
        pub_date: req.pub_date,
        location_id: req.location_id,
        category_id: req.category_id,
    }
}

pub fn comment_form(req: CommentRequest) -> CommentForm {
    CommentForm { text: req.text }
}

pub fn registration_form(req: RegisterUserRequest) -> RegistrationForm {
    RegistrationForm {
        username: req.username,
        email: req.email,
        password: req.password,
    }
}

pub fn profile_form(req: UpdateProfileRequest) -> ProfileForm {
    ProfileForm {
        username: req.username,
        first_name: req.first_name,
        last_name: req.last_name,
        email: req.email,
    }
}

pub fn category_form(req: CategoryRequest) -> CategoryForm {
    CategoryForm {
        title: req.title,
        description: req.description,
        slug: req.slug,
        is_published: req.is_published,
    }
}

pub fn location_form(req: LocationRequest) -> LocationForm {
    LocationForm {
        name: req.name,
        is_published: req.is_published,
    }
}

pub fn publication_form(req: PublicationRequest) -> PublicationForm {
    PublicationForm {
        is_published: req.is_published,
        pub_date: req.pub_date,
    }
}
