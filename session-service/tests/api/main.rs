mod check;
mod helpers;
mod login;
mod logout;
mod refresh;
