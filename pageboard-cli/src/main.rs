use std::process;

use anyhow::{Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use pageboard_client::{ClientError, Order, PageboardClient, Post, PostsPage, PostsQuery, User};
use serde::Serialize;

const DEFAULT_SERVER: &str = "http://127.0.0.1:3000";
const SERVER_ENV: &str = "PAGEBOARD_SERVER";

#[derive(Debug, Parser)]
#[command(name = "pageboard-cli", version, about = "CLI клиент для pageboard-server")]
struct Cli {
    /// Адрес сервера. По умолчанию `PAGEBOARD_SERVER` или `http://127.0.0.1:3000`.
    #[arg(long, global = true)]
    server: Option<String>,

    /// Печатать ответы сервера в JSON.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Пользователи.
    #[command(subcommand)]
    Users(UsersCommand),
    /// Посты.
    #[command(subcommand)]
    Posts(PostsCommand),
}

#[derive(Debug, Subcommand)]
enum UsersCommand {
    /// Регистрация пользователя.
    Create {
        #[arg(long)]
        nickname: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Список пользователей.
    List,
}

#[derive(Debug, Subcommand)]
enum PostsCommand {
    /// Создание поста.
    Create {
        #[arg(long)]
        author_id: i64,
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
        /// Имя файла изображения в `public/posts`.
        #[arg(long)]
        image: Option<String>,
    },
    /// Получение поста по id.
    Get {
        #[arg(long)]
        id: i64,
    },
    /// Частичное обновление поста.
    Update {
        #[arg(long)]
        id: i64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        content: Option<String>,
    },
    /// Удаление поста.
    Delete {
        #[arg(long)]
        id: i64,
    },
    /// Генерация 100 тестовых постов для автора.
    Generate {
        #[arg(long)]
        author_id: i64,
    },
    /// Список постов.
    List(ListArgs),
}

#[derive(Debug, Args)]
struct ListArgs {
    #[arg(long)]
    take: Option<u32>,
    /// Номер страницы; включает постраничный режим.
    #[arg(long)]
    page: Option<u32>,
    #[arg(long, value_enum)]
    order: Option<OrderArg>,
    /// Курсор `where__id__less_than`.
    #[arg(long)]
    less_than: Option<i64>,
    /// Курсор `where__id__more_than`.
    #[arg(long)]
    more_than: Option<i64>,
    /// Дополнительный параметр `key=value`, можно повторять.
    #[arg(long = "filter", value_parser = parse_filter)]
    filters: Vec<(String, String)>,
    /// Пройти все страницы по `next`-ссылкам.
    #[arg(long)]
    all: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OrderArg {
    Asc,
    Desc,
}

impl From<OrderArg> for Order {
    fn from(value: OrderArg) -> Self {
        match value {
            OrderArg::Asc => Order::Asc,
            OrderArg::Desc => Order::Desc,
        }
    }
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("Ошибка: {err}");
        process::exit(1);
    }
}

async fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let server = resolve_server(cli.server, std::env::var(SERVER_ENV).ok());
    let client = PageboardClient::new(server).map_err(map_client_error)?;
    let json = cli.json;

    match cli.command {
        Command::Users(UsersCommand::Create {
            nickname,
            email,
            password,
        }) => {
            let user = client
                .create_user(&nickname, &email, &password)
                .await
                .map_err(map_client_error)?;
            output(json, &user, || print_user("Пользователь создан", &user))?;
        }
        Command::Users(UsersCommand::List) => {
            let users = client.list_users().await.map_err(map_client_error)?;
            output(json, &users, || {
                println!("Пользователей: {}", users.len());
                for user in &users {
                    println!("- [{}] {} <{}> ({})", user.id, user.nickname, user.email, user.role);
                }
            })?;
        }
        Command::Posts(PostsCommand::Create {
            author_id,
            title,
            content,
            image,
        }) => {
            let post = client
                .create_post(author_id, &title, &content, image.as_deref())
                .await
                .map_err(map_client_error)?;
            output(json, &post, || print_post("Пост создан", &post))?;
        }
        Command::Posts(PostsCommand::Get { id }) => {
            let post = client.get_post(id).await.map_err(map_client_error)?;
            output(json, &post, || print_post("Пост", &post))?;
        }
        Command::Posts(PostsCommand::Update { id, title, content }) => {
            if title.is_none() && content.is_none() {
                bail!("укажите --title и/или --content");
            }
            let post = client
                .update_post(id, title.as_deref(), content.as_deref())
                .await
                .map_err(map_client_error)?;
            output(json, &post, || print_post("Пост обновлён", &post))?;
        }
        Command::Posts(PostsCommand::Delete { id }) => {
            let id = client.delete_post(id).await.map_err(map_client_error)?;
            println!("Пост удалён: id={id}");
        }
        Command::Posts(PostsCommand::Generate { author_id }) => {
            let created = client
                .generate_posts(author_id)
                .await
                .map_err(map_client_error)?;
            println!("Создано постов: {created}");
        }
        Command::Posts(PostsCommand::List(args)) => {
            list_posts(&client, args, json).await?;
        }
    }

    Ok(())
}

async fn list_posts(client: &PageboardClient, args: ListArgs, json: bool) -> Result<()> {
    if args.all && args.page.is_some() {
        bail!("--all работает только в курсорном режиме, уберите --page");
    }
    let walk_all = args.all;
    let query = build_query(args);

    let mut page = client
        .paginate_posts(&query)
        .await
        .map_err(map_client_error)?;
    if !walk_all {
        return output(json, &page, || print_page(&page));
    }

    let mut posts: Vec<Post> = Vec::new();
    loop {
        posts.extend(page.posts().iter().cloned());
        let Some(next) = page.next().map(str::to_owned) else {
            break;
        };
        page = client.follow_next(&next).await.map_err(map_client_error)?;
    }

    output(json, &posts, || {
        println!("Всего постов: {}", posts.len());
        for post in &posts {
            print_post_line(post);
        }
    })
}

fn build_query(args: ListArgs) -> PostsQuery {
    PostsQuery {
        take: args.take,
        page: args.page,
        order: args.order.map(Order::from),
        id_less_than: args.less_than,
        id_more_than: args.more_than,
        extra: args.filters,
    }
}

fn resolve_server(flag: Option<String>, env: Option<String>) -> String {
    let raw = flag
        .or(env)
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_SERVER.to_string());
    normalize_server(raw.trim().to_string())
}

fn normalize_server(server: String) -> String {
    if server.starts_with("http://") || server.starts_with("https://") {
        return server;
    }

    format!("http://{server}")
}

fn parse_filter(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(format!("ожидается key=value, получено `{raw}`")),
    }
}

fn map_client_error(err: ClientError) -> anyhow::Error {
    let message = match err {
        ClientError::NotFound => "ресурс не найден".to_string(),
        ClientError::Conflict(message) => format!("ресурс уже существует: {message}"),
        ClientError::InvalidRequest(message) => format!("некорректный запрос: {message}"),
        ClientError::Server(message) => format!("ошибка сервера: {message}"),
        ClientError::InvalidUrl(message) => format!("некорректный адрес: {message}"),
        ClientError::Http(err) => format!("ошибка HTTP: {err}"),
    };
    anyhow::anyhow!(message)
}

fn output<T: Serialize>(json: bool, value: &T, print_text: impl FnOnce()) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        print_text();
    }
    Ok(())
}

fn print_user(title: &str, user: &User) {
    println!("{title}");
    println!("id: {}", user.id);
    println!("nickname: {}", user.nickname);
    println!("email: {}", user.email);
    println!("role: {}", user.role);
    println!("created_at: {}", user.created_at);
}

fn print_post(title: &str, post: &Post) {
    println!("{title}");
    println!("id: {}", post.id);
    println!("title: {}", post.title);
    println!("content: {}", post.content);
    println!("author_id: {}", post.author_id);
    if let Some(image) = &post.image {
        println!("image: {image}");
    }
    println!("likes: {}, comments: {}", post.like_count, post.comment_count);
    println!("created_at: {}", post.created_at);
    println!("updated_at: {}", post.updated_at);
}

fn print_post_line(post: &Post) {
    println!("- [{}] {} (author_id={})", post.id, post.title, post.author_id);
}

fn print_page(page: &PostsPage) {
    match page {
        PostsPage::Cursor(page) => {
            let after = page
                .cursor
                .after
                .map_or_else(|| "-".to_string(), |id| id.to_string());
            println!("Постов: {} (after={after})", page.count);
        }
        PostsPage::Numbered(page) => {
            println!("Постов: {} (total={})", page.data.len(), page.total);
        }
    }

    for post in page.posts() {
        print_post_line(post);
    }

    if let Some(next) = page.next() {
        println!("next: {next}");
    }
}
