use api::{Client, HttpTransport, ProductQuery, Reaction};
use client::{
    Account, Catalog, FavoriteToggle, FavoritesShelf, LikeBoard, NotificationInbox, ProfileCard,
    ReviewThread, ScopeHandle,
};
use store::FileStore;

use crate::Command;

type App = Client<HttpTransport, FileStore>;

pub async fn run(client: &App, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Login {
            email,
            password,
            otp,
        } => {
            let user = Account::new(client.clone())
                .sign_in(&email, &password, otp.as_deref())
                .await?;
            println!("Signed in as {}", user.display_name().unwrap_or(&user.email));
        }
        Command::Register {
            name,
            email,
            password,
        } => {
            let user = Account::new(client.clone())
                .sign_up(&name, &email, &password)
                .await?;
            println!("Welcome, {}", user.display_name().unwrap_or(&user.email));
        }
        Command::Logout => {
            Account::new(client.clone()).sign_out().await;
            println!("Signed out");
        }
        Command::Whoami => match client.session().current_user() {
            Some(user) => println!("{} <{}>", user.display_name().unwrap_or("-"), user.email),
            None => println!("Not signed in"),
        },
        Command::Products {
            search,
            brand,
            category,
            sort,
            min_rating,
            pages,
        } => {
            let mut query = ProductQuery::new();
            query.search = search;
            query.brand = brand;
            query.category_id = category;
            query.sort_by = sort.map(Into::into);
            query.min_rating = min_rating;

            let catalog = Catalog::new(client.clone(), ScopeHandle::detached());
            catalog.search(query).await?;
            for _ in 1..pages.max(1) {
                if catalog.is_exhausted() {
                    break;
                }
                catalog.load_more().await?;
            }
            for product in catalog.products() {
                println!(
                    "{:<38} {:<32} {:>10} {:>4} ({})",
                    product.id,
                    product.title(),
                    product.price.map(|p| format!("{p:.0} {}", product.currency)).unwrap_or_default(),
                    product.average_rating.map(|r| format!("{r:.1}")).unwrap_or_else(|| "-".into()),
                    product.review_count,
                );
            }
        }
        Command::Filters => {
            let catalog = Catalog::new(client.clone(), ScopeHandle::detached());
            catalog.load_filters().await?;
            println!("Brands: {}", catalog.brands().join(", "));
            for category in catalog.categories() {
                println!("{:<38} {}", category.id, category.name);
            }
        }
        Command::Product { id } => {
            let thread = ReviewThread::new(client.clone(), id, ScopeHandle::detached());
            thread.load().await?;
            let likes = LikeBoard::new(client.clone(), ScopeHandle::detached());
            let reviews = thread.reviews();
            likes.refresh(&reviews).await?;

            if let Some(product) = thread.product() {
                println!("{} ({} reviews)", product.title(), product.review_count);
            }
            for review in reviews {
                let stats = likes.stats(&review.id).unwrap_or_default();
                println!(
                    "[{}] {}/5 by {} (+{} -{}): {}",
                    review.id, review.rating, review.author_alias, stats.like_count, stats.dislike_count, review.body
                );
            }
        }
        Command::Review {
            product_id,
            rating,
            text,
        } => {
            let thread = ReviewThread::new(client.clone(), product_id, ScopeHandle::detached());
            let ack = thread.submit(rating, &text).await?;
            println!("{}", ack.message);
        }
        Command::React {
            product_id,
            review_id,
            dislike,
        } => {
            let thread = ReviewThread::new(client.clone(), product_id, ScopeHandle::detached());
            let likes = LikeBoard::new(client.clone(), ScopeHandle::detached());
            likes
                .react(&thread, &review_id, Reaction::from_is_like(!dislike))
                .await?;
            if let Some(stats) = likes.stats(&review_id) {
                println!("+{} -{}", stats.like_count, stats.dislike_count);
            }
        }
        Command::Favorite { product_id } => {
            let heart = FavoriteToggle::new(client.clone(), product_id, ScopeHandle::detached());
            heart.load().await?;
            let now = heart.toggle().await?;
            println!("{}", if now { "Added to favorites" } else { "Removed from favorites" });
        }
        Command::Favorites => {
            let shelf = FavoritesShelf::new(client.clone(), ScopeHandle::detached());
            shelf.load().await?;
            for favorite in shelf.favorites() {
                println!("{:<38} {}", favorite.product_id, favorite.product.title());
            }
        }
        Command::Profile { user_id, toggle } => {
            let card = ProfileCard::new(client.clone(), user_id, ScopeHandle::detached());
            card.load().await?;
            if toggle {
                let now = card.toggle().await?;
                println!("{}", if now { "Following" } else { "Unfollowed" });
            }
            if let Some(profile) = card.profile() {
                println!(
                    "{} <{}>: {} followers, {} following, {} reviews",
                    profile.display_name(),
                    profile.email,
                    profile.follower_count,
                    profile.following_count,
                    profile.review_count,
                );
            }
        }
        Command::Notifications { read, read_all } => {
            let inbox = NotificationInbox::new(client.clone(), ScopeHandle::detached());
            inbox.refresh().await?;
            if read_all {
                inbox.mark_all_read().await?;
            } else if let Some(id) = read {
                inbox.open(&id).await?;
            }
            println!("{} unread", inbox.unread_count());
            for n in inbox.notifications() {
                let marker = if n.is_read { ' ' } else { '*' };
                println!("{marker} [{}] {}: {}", n.id, n.title, n.message);
            }
        }
    }
    Ok(())
}
